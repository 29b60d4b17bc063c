//! Domain models: products, snapshots, revisions, proposed changes.

pub mod change;
pub mod product;
pub mod revision;

pub use change::{CategoryChangePayload, ChangeKind, ProductChangePayload, ProposedChange};
pub use product::{Product, ProductSnapshot, SNAPSHOT_SCHEMA_VERSION};
pub use revision::{Revision, RevisionSummary, MAJOR_CHANGE_THRESHOLD};

/// Generate a new UUIDv7 identifier string (time-ordered).
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
