use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version for persisted snapshots.
///
/// Bump when the snapshot field set changes so historical diffs stay decodable.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

/// Point-in-time value of a product's versioned fields.
///
/// This is the unit the diff engine compares and the payload stored whole on
/// every revision row. Absent fields deserialize to their empty/zero value,
/// so the diff engine never sees partial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Schema tag carried inside every persisted snapshot
    #[serde(default = "default_schema_version")]
    pub snapshot_schema_version: u32,

    pub title: String,
    #[serde(default)]
    pub short_desc: String,
    #[serde(default)]
    pub long_desc: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub markdown_content: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub analytics_list: Vec<String>,
    #[serde(default)]
    pub security_score: f64,
    #[serde(default)]
    pub ux_score: f64,
    #[serde(default)]
    pub decent_score: f64,
    #[serde(default)]
    pub vibes_score: f64,
}

impl ProductSnapshot {
    /// Create a snapshot with the given title and everything else empty/zero.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            snapshot_schema_version: SNAPSHOT_SCHEMA_VERSION,
            title: title.into(),
            short_desc: String::new(),
            long_desc: String::new(),
            logo_url: String::new(),
            markdown_content: String::new(),
            is_verified: false,
            approved: false,
            analytics_list: Vec::new(),
            security_score: 0.0,
            ux_score: 0.0,
            decent_score: 0.0,
            vibes_score: 0.0,
        }
    }
}

impl Default for ProductSnapshot {
    fn default() -> Self {
        Self::new("")
    }
}

/// Product - the mutable aggregate under version control
///
/// The entity store owns exactly one row per product holding the latest field
/// values and the current revision pointer. Every mutation goes through the
/// revision service; nothing else may touch `current_revision_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier for this product (UUID v7)
    pub id: String,

    /// User who originally submitted the product
    pub submitter_id: Option<String>,

    /// Latest versioned field values
    #[serde(flatten)]
    pub snapshot: ProductSnapshot,

    /// Number of the newest revision; starts at 1, strictly increases by 1
    pub current_revision_number: u32,

    /// Editor of the newest revision
    pub last_editor_id: Option<String>,

    /// Timestamp when this product was first accepted
    pub created_at: DateTime<Utc>,

    /// Timestamp of the newest accepted change
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product at revision 1 from its baseline snapshot.
    ///
    /// The submitter is recorded as the initial last editor, matching the
    /// baseline revision's editor.
    pub fn new(id: String, submitter_id: Option<String>, snapshot: ProductSnapshot) -> Self {
        let now = Utc::now();
        Self {
            id,
            last_editor_id: submitter_id.clone(),
            submitter_id,
            snapshot,
            current_revision_number: 1,
            created_at: now,
            updated_at: now,
        }
    }
}
