//! Error handling for prodex-store
//!
//! Wraps prodex-core PxError with store-specific helpers

use prodex_core::errors::{PxError, PxErrorKind};

/// Result type alias using PxError
pub type Result<T> = std::result::Result<T, PxError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> PxError {
    PxError::new(PxErrorKind::Storage)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> PxError {
    PxError::new(PxErrorKind::Storage)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> PxError {
    PxError::new(PxErrorKind::Storage)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a snapshot decode error for a corrupted revision row
pub fn snapshot_decode_error(revision_id: &str, err: serde_json::Error) -> PxError {
    PxError::new(PxErrorKind::Serialization)
        .with_op("decode_snapshot")
        .with_message(format!(
            "Failed to decode snapshot for revision {}: {}",
            revision_id, err
        ))
}
