//! Append-only revision log access.
//!
//! One immutable row per (product, revision number). Rows are appended inside
//! the revision service's write transaction and never updated or deleted.

use crate::errors::{from_rusqlite, snapshot_decode_error, Result};
use prodex_core::diff::model::FieldChange;
use prodex_core::model::product::ProductSnapshot;
use prodex_core::model::revision::{Revision, RevisionSummary};
use rusqlite::{Connection, OptionalExtension, Transaction};

/// A raw row from the `product_revisions` table (field changes not loaded).
#[derive(Debug, Clone)]
pub struct RevisionRow {
    /// Unique revision row identifier (UUIDv7)
    pub id: String,
    pub product_id: String,
    pub revision_number: u32,
    pub editor_id: Option<String>,
    pub edit_summary: Option<String>,
    /// Complete product state at this revision, JSON-encoded
    pub snapshot_json: String,
    /// Creation timestamp, milliseconds since epoch
    pub created_at: i64,
}

impl RevisionRow {
    /// Decode the stored snapshot.
    pub fn snapshot(&self) -> Result<ProductSnapshot> {
        serde_json::from_str(&self.snapshot_json)
            .map_err(|e| snapshot_decode_error(&self.id, e))
    }

    /// Hydrate into a full [`Revision`] with its field changes.
    pub fn into_revision(self, field_changes: Vec<FieldChange>) -> Result<Revision> {
        let snapshot = self.snapshot()?;
        Ok(Revision {
            created_at: chrono::DateTime::from_timestamp_millis(self.created_at)
                .unwrap_or_else(chrono::Utc::now),
            id: self.id,
            product_id: self.product_id,
            revision_number: self.revision_number,
            editor_id: self.editor_id,
            edit_summary: self.edit_summary,
            field_changes,
            snapshot,
        })
    }
}

/// Append a revision row inside the caller's transaction.
///
/// `diff_json` is NULL for the baseline (nothing to diff against) and the
/// serialized change list otherwise. Returns the new row's id, which the
/// field-change recorder uses as its foreign key.
pub fn append_revision_tx(
    tx: &Transaction,
    product_id: &str,
    revision_number: u32,
    editor_id: Option<&str>,
    edit_summary: Option<&str>,
    changes: &[FieldChange],
    snapshot: &ProductSnapshot,
    created_at_ms: i64,
) -> Result<String> {
    let snapshot_json = serde_json::to_string(snapshot)?;
    let diff_json = if revision_number == 1 {
        None
    } else {
        Some(serde_json::to_string(changes)?)
    };

    // UUIDv7 for temporal ordering within the ledger
    let revision_id = uuid::Uuid::now_v7().to_string();
    tx.execute(
        "INSERT INTO product_revisions
            (id, product_id, revision_number, editor_id, edit_summary, diff_json,
             snapshot_json, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            revision_id,
            product_id,
            revision_number,
            editor_id,
            edit_summary,
            diff_json,
            snapshot_json,
            created_at_ms,
        ],
    )
    .map_err(from_rusqlite)?;

    tracing::debug!(
        product_id = %product_id,
        revision_number = revision_number,
        change_count = changes.len(),
        "Appended revision"
    );

    Ok(revision_id)
}

/// Fetch a single revision row by (product, number).
pub fn get_revision(
    conn: &Connection,
    product_id: &str,
    revision_number: u32,
) -> Result<Option<RevisionRow>> {
    conn.query_row(
        "SELECT id, product_id, revision_number, editor_id, edit_summary,
                snapshot_json, created_at
         FROM product_revisions
         WHERE product_id = ?1 AND revision_number = ?2",
        rusqlite::params![product_id, revision_number],
        row_to_revision_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Highest revision number recorded for a product, if any.
pub fn max_revision_number(conn: &Connection, product_id: &str) -> Result<Option<u32>> {
    conn.query_row(
        "SELECT MAX(revision_number) FROM product_revisions WHERE product_id = ?1",
        [product_id],
        |row| row.get::<_, Option<u32>>(0),
    )
    .map_err(from_rusqlite)
}

/// Check whether a baseline (revision 1) already exists for a product.
pub fn baseline_exists(conn: &Connection, product_id: &str) -> Result<bool> {
    let exists: bool = conn
        .query_row(
            "SELECT 1 FROM product_revisions WHERE product_id = ?1 AND revision_number = 1",
            [product_id],
            |_| Ok(true),
        )
        .optional()
        .map_err(from_rusqlite)?
        .unwrap_or(false);
    Ok(exists)
}

/// One page of revision history for a product, newest first.
///
/// Returns the summaries plus the total revision count for UI paging.
/// `page` is 1-based.
pub fn history_page(
    conn: &Connection,
    product_id: &str,
    page: u32,
    page_size: u32,
) -> Result<(Vec<RevisionSummary>, u64)> {
    let total: u64 = conn
        .query_row(
            "SELECT COUNT(*) FROM product_revisions WHERE product_id = ?1",
            [product_id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;

    let offset = (page.saturating_sub(1) as i64) * page_size as i64;

    let mut stmt = conn
        .prepare(
            "SELECT pr.revision_number, pr.edit_summary, pr.editor_id, pr.created_at,
                    COALESCE((SELECT COUNT(*) FROM product_field_changes pfc
                              WHERE pfc.revision_id = pr.id), 0) AS change_count
             FROM product_revisions pr
             WHERE pr.product_id = ?1
             ORDER BY pr.revision_number DESC
             LIMIT ?2 OFFSET ?3",
        )
        .map_err(from_rusqlite)?;

    let summaries = stmt
        .query_map(
            rusqlite::params![product_id, page_size, offset],
            |row| {
                let revision_number: u32 = row.get(0)?;
                let edit_summary: Option<String> = row.get(1)?;
                let editor_id: Option<String> = row.get(2)?;
                let created_at_ms: i64 = row.get(3)?;
                let change_count: i64 = row.get(4)?;
                Ok((
                    revision_number,
                    edit_summary,
                    editor_id,
                    created_at_ms,
                    change_count as usize,
                ))
            },
        )
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?
        .into_iter()
        .map(
            |(revision_number, edit_summary, editor_id, created_at_ms, change_count)| {
                RevisionSummary {
                    revision_number,
                    edit_summary,
                    editor_id,
                    created_at: chrono::DateTime::from_timestamp_millis(created_at_ms)
                        .unwrap_or_else(chrono::Utc::now),
                    change_count,
                    major_change: RevisionSummary::is_major(change_count),
                    product_id: None,
                    product_title: None,
                }
            },
        )
        .collect();

    Ok((summaries, total))
}

/// Most recent revisions across all products, newest first.
///
/// Summaries carry the owning product's id and current title for feed display.
pub fn recent_edits(conn: &Connection, limit: u32) -> Result<Vec<RevisionSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT pr.product_id, p.title, pr.revision_number, pr.edit_summary,
                    pr.editor_id, pr.created_at,
                    COALESCE((SELECT COUNT(*) FROM product_field_changes pfc
                              WHERE pfc.revision_id = pr.id), 0) AS change_count
             FROM product_revisions pr
             LEFT JOIN products p ON pr.product_id = p.id
             ORDER BY pr.created_at DESC, pr.id DESC
             LIMIT ?1",
        )
        .map_err(from_rusqlite)?;

    let edits = stmt
        .query_map([limit], |row| {
            let product_id: String = row.get(0)?;
            let product_title: Option<String> = row.get(1)?;
            let revision_number: u32 = row.get(2)?;
            let edit_summary: Option<String> = row.get(3)?;
            let editor_id: Option<String> = row.get(4)?;
            let created_at_ms: i64 = row.get(5)?;
            let change_count: i64 = row.get(6)?;
            Ok((
                product_id,
                product_title,
                revision_number,
                edit_summary,
                editor_id,
                created_at_ms,
                change_count as usize,
            ))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?
        .into_iter()
        .map(
            |(
                product_id,
                product_title,
                revision_number,
                edit_summary,
                editor_id,
                created_at_ms,
                change_count,
            )| RevisionSummary {
                revision_number,
                edit_summary,
                editor_id,
                created_at: chrono::DateTime::from_timestamp_millis(created_at_ms)
                    .unwrap_or_else(chrono::Utc::now),
                change_count,
                major_change: RevisionSummary::is_major(change_count),
                product_id: Some(product_id),
                product_title,
            },
        )
        .collect();

    Ok(edits)
}

fn row_to_revision_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RevisionRow> {
    Ok(RevisionRow {
        id: row.get(0)?,
        product_id: row.get(1)?,
        revision_number: row.get(2)?,
        editor_id: row.get(3)?,
        edit_summary: row.get(4)?,
        snapshot_json: row.get(5)?,
        created_at: row.get(6)?,
    })
}
