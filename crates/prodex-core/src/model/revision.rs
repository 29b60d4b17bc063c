use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::model::FieldChange;
use crate::model::product::ProductSnapshot;

/// A revision with strictly more than this many field changes is flagged as
/// a major change in history listings.
pub const MAJOR_CHANGE_THRESHOLD: usize = 2;

/// Revision - an immutable, numbered snapshot of a product's full state
///
/// Keyed by `(product_id, revision_number)`; numbers form a gapless sequence
/// starting at 1. Created exactly once, inside the same transaction as the
/// entity-store update, and never modified or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    /// Unique row identifier (UUID v7)
    pub id: String,

    /// Product this revision belongs to
    pub product_id: String,

    /// Position in the product's revision sequence (1 = baseline)
    pub revision_number: u32,

    /// Editor identity; None for system-originated revisions
    pub editor_id: Option<String>,

    /// Human-readable edit summary; required for user-initiated edits,
    /// None only on system-originated revisions
    pub edit_summary: Option<String>,

    /// Field-level changes against the immediately preceding revision.
    /// Empty for revision 1 (the baseline has nothing to diff against).
    pub field_changes: Vec<FieldChange>,

    /// Complete copy of the product's versioned fields at this point
    pub snapshot: ProductSnapshot,

    /// Timestamp when this revision was committed
    pub created_at: DateTime<Utc>,
}

impl Revision {
    /// True for the baseline revision (number 1, no field changes).
    pub fn is_baseline(&self) -> bool {
        self.revision_number == 1
    }
}

/// RevisionSummary - read-only projection for history listings and feeds
///
/// Never persisted; computed from revision rows and their change counts at
/// read time. `product_id`/`product_title` are populated only for the
/// cross-product recent-edits feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionSummary {
    pub revision_number: u32,
    pub edit_summary: Option<String>,
    pub editor_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Number of field changes recorded for this revision
    pub change_count: usize,
    /// Derived flag, see [`MAJOR_CHANGE_THRESHOLD`]
    pub major_change: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_title: Option<String>,
}

impl RevisionSummary {
    /// Derive the major-change flag from a change count.
    pub fn is_major(change_count: usize) -> bool {
        change_count > MAJOR_CHANGE_THRESHOLD
    }
}
