//! Prodex Engine - revision service orchestration
//!
//! The [`service::RevisionService`] is the only component permitted to mutate
//! the entity store or append to the revision log. It serializes writers per
//! product, runs the diff engine, and commits revision + field changes +
//! entity update as one transaction.
//!
//! [`gate::ModerationGate`] is the inward-facing edge of the external
//! approval workflow: it decodes accepted change payloads and routes them to
//! the service.

pub mod config;
pub mod gate;
pub mod lock;
pub mod service;

pub use config::ServiceConfig;
pub use gate::{GateOutcome, ModerationGate};
pub use service::{
    ApplyChangeRequest, ApplyOutcome, HistoryPage, NewProduct, RevisionService,
    RECENT_EDITS_HARD_CAP,
};
