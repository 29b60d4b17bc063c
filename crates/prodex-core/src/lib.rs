//! Prodex Core - domain kernel for the product revision engine
//!
//! This crate provides the foundational data structures and pure logic for
//! Prodex:
//! - Product and snapshot models with explicit snapshot schema versioning
//! - Immutable revision and field-change models
//! - The pure field-level diff engine with deterministic ordering
//! - The structured error facility with stable error codes
//! - Authorization policy trait for the moderation boundary
//!
//! Persistence lives in `prodex-store`; orchestration in `prodex-engine`.

pub mod diff;
pub mod errors;
pub mod logging;
pub mod model;
pub mod policy;

// Re-export commonly used types
pub use diff::engine::compute_diff;
pub use diff::human_summary::change_count_summary;
pub use diff::model::{ChangeType, FieldChange, ProductDiff};
pub use errors::{PxError, PxErrorKind, Result};
pub use model::{
    ChangeKind, Product, ProductSnapshot, ProposedChange, Revision, RevisionSummary,
};
pub use policy::{AllowAllPolicy, AuthorizationPolicy, DenyAllPolicy};
