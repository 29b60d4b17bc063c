//! Diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Change lists are ordered by field name for deterministic serialization.

use serde::{Deserialize, Serialize};

/// Classification of a single field change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// The prior value was empty/absent
    Added,
    /// Both sides carry a value and they differ
    Modified,
    /// The new value is empty/absent
    Removed,
}

impl ChangeType {
    /// Stable string form used in storage and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Modified => "modified",
            ChangeType::Removed => "removed",
        }
    }

    /// Parse the stable string form. Returns None for unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "added" => Some(ChangeType::Added),
            "modified" => Some(ChangeType::Modified),
            "removed" => Some(ChangeType::Removed),
            _ => None,
        }
    }
}

/// One field's before/after delta within a revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Snapshot field name (snake_case, matches the wire shape)
    pub field_name: String,
    /// Display representation before the change; None when the field was absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    /// Display representation after the change; None when the field was removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub change_type: ChangeType,
}

/// The differences between two product revisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDiff {
    pub from_revision: u32,
    pub to_revision: u32,
    /// Changes ordered by field name
    pub changes: Vec<FieldChange>,
    /// Human-readable count summary, e.g. `"3 field(s) changed"`
    pub summary: String,
}
