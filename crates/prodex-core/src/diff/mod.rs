//! Field-level snapshot diffing.
//!
//! [`engine::compute_diff`] is the pure comparison entry point;
//! [`model`] holds the change types shared with the revision models;
//! [`human_summary`] renders diffs for review displays.

pub mod engine;
pub mod human_summary;
pub mod model;
