//! Repository layer bridging domain models to SQLite rows.
//!
//! Writes are exposed as `_tx` functions taking a [`rusqlite::Transaction`]
//! so the revision service composes them atomically; reads take a plain
//! connection and never lock (revisions are immutable once committed).

pub mod field_changes;
pub mod product_repo;
pub mod revision_repo;
