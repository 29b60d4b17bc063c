use serde::{Deserialize, Serialize};

use crate::errors::ChangeDecodeError;
use crate::model::product::ProductSnapshot;

/// Whether a proposed change creates a new entity or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Create,
    Update,
}

/// A proposed change accepted by the moderation gate, decoded into a typed
/// value before it ever reaches the revision service.
///
/// The wire shape is tagged by `entity_type`, replacing the old free-form
/// string-keyed blob the gate used to pass around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity_type", rename_all = "snake_case")]
pub enum ProposedChange {
    Product(ProductChangePayload),
    Category(CategoryChangePayload),
}

impl ProposedChange {
    /// Decode a raw JSON change payload.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeDecodeError`] when the payload is not valid JSON or
    /// does not match the tagged change shape.
    pub fn decode(raw: &str) -> Result<Self, ChangeDecodeError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Proposed product creation or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductChangePayload {
    /// Target product; None for a create (an id is generated)
    #[serde(default)]
    pub entity_id: Option<String>,
    pub change_kind: ChangeKind,
    /// The full proposed state; absent fields normalize to empty/zero
    pub snapshot: ProductSnapshot,
}

/// Proposed category creation or update.
///
/// Category tagging itself is handled outside this core; the variant exists
/// so the gate decodes every accepted payload into one typed value and can
/// reject unsupported routes with a typed error instead of passing raw JSON
/// downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryChangePayload {
    #[serde(default)]
    pub entity_id: Option<String>,
    pub change_kind: ChangeKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
