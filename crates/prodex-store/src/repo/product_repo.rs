//! Entity store access: the current mutable state of each product.
//!
//! One row per product in the `products` table. The row's
//! `current_revision_number` is the optimistic-concurrency token: the update
//! only lands when the caller's expected number still matches.

use crate::errors::{from_rusqlite, Result};
use prodex_core::model::product::{Product, ProductSnapshot};
use rusqlite::{Connection, OptionalExtension, Transaction};

/// Insert a brand-new product row (revision 1).
///
/// Meant to be called within the same transaction as the baseline revision
/// append.
pub fn insert_product_tx(tx: &Transaction, product: &Product) -> Result<()> {
    tx.execute(
        "INSERT INTO products (
            id, title, short_desc, long_desc, logo_url, markdown_content, submitter_id,
            approved, is_verified, analytics_list, security_score, ux_score, decent_score,
            vibes_score, current_revision_number, last_editor_id, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        rusqlite::params![
            product.id,
            product.snapshot.title,
            product.snapshot.short_desc,
            product.snapshot.long_desc,
            product.snapshot.logo_url,
            product.snapshot.markdown_content,
            product.submitter_id,
            if product.snapshot.approved { 1 } else { 0 },
            if product.snapshot.is_verified { 1 } else { 0 },
            serde_json::to_string(&product.snapshot.analytics_list)
                .unwrap_or_else(|_| "[]".to_string()),
            product.snapshot.security_score,
            product.snapshot.ux_score,
            product.snapshot.decent_score,
            product.snapshot.vibes_score,
            product.current_revision_number,
            product.last_editor_id,
            product.created_at.timestamp_millis(),
            product.updated_at.timestamp_millis(),
        ],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

/// Update a product row to new field values and revision pointer, guarded by
/// the expected current revision number.
///
/// Returns `true` when the guard matched and exactly one row was updated;
/// `false` means another writer moved the pointer first and the caller must
/// retry or surface a conflict.
pub fn update_current_tx(
    tx: &Transaction,
    product_id: &str,
    snapshot: &ProductSnapshot,
    new_revision_number: u32,
    editor_id: Option<&str>,
    updated_at_ms: i64,
    expected_revision_number: u32,
) -> Result<bool> {
    let rows = tx
        .execute(
            "UPDATE products
             SET title = ?1, short_desc = ?2, long_desc = ?3, logo_url = ?4,
                 markdown_content = ?5, approved = ?6, is_verified = ?7,
                 analytics_list = ?8, security_score = ?9, ux_score = ?10,
                 decent_score = ?11, vibes_score = ?12, current_revision_number = ?13,
                 last_editor_id = ?14, updated_at = ?15
             WHERE id = ?16 AND current_revision_number = ?17",
            rusqlite::params![
                snapshot.title,
                snapshot.short_desc,
                snapshot.long_desc,
                snapshot.logo_url,
                snapshot.markdown_content,
                if snapshot.approved { 1 } else { 0 },
                if snapshot.is_verified { 1 } else { 0 },
                serde_json::to_string(&snapshot.analytics_list)
                    .unwrap_or_else(|_| "[]".to_string()),
                snapshot.security_score,
                snapshot.ux_score,
                snapshot.decent_score,
                snapshot.vibes_score,
                new_revision_number,
                editor_id,
                updated_at_ms,
                product_id,
                expected_revision_number,
            ],
        )
        .map_err(from_rusqlite)?;

    Ok(rows == 1)
}

/// Get the current state of a product.
///
/// Returns None when no row exists (unknown product).
pub fn get_current(conn: &Connection, product_id: &str) -> Result<Option<Product>> {
    conn.query_row(
        "SELECT id, title, short_desc, long_desc, logo_url, markdown_content, submitter_id,
                approved, is_verified, analytics_list, security_score, ux_score, decent_score,
                vibes_score, current_revision_number, last_editor_id, created_at, updated_at
         FROM products WHERE id = ?1",
        [product_id],
        row_to_product,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Check whether a product row exists.
pub fn product_exists(conn: &Connection, product_id: &str) -> Result<bool> {
    let exists: bool = conn
        .query_row("SELECT 1 FROM products WHERE id = ?1", [product_id], |_| {
            Ok(true)
        })
        .optional()
        .map_err(from_rusqlite)?
        .unwrap_or(false);
    Ok(exists)
}

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let short_desc: String = row.get(2)?;
    let long_desc: String = row.get(3)?;
    let logo_url: String = row.get(4)?;
    let markdown_content: String = row.get(5)?;
    let submitter_id: Option<String> = row.get(6)?;
    let approved: i32 = row.get(7)?;
    let is_verified: i32 = row.get(8)?;
    let analytics_json: String = row.get(9)?;
    let security_score: f64 = row.get(10)?;
    let ux_score: f64 = row.get(11)?;
    let decent_score: f64 = row.get(12)?;
    let vibes_score: f64 = row.get(13)?;
    let current_revision_number: u32 = row.get(14)?;
    let last_editor_id: Option<String> = row.get(15)?;
    let created_at_ms: i64 = row.get(16)?;
    let updated_at_ms: i64 = row.get(17)?;

    let mut snapshot = ProductSnapshot::new(title);
    snapshot.short_desc = short_desc;
    snapshot.long_desc = long_desc;
    snapshot.logo_url = logo_url;
    snapshot.markdown_content = markdown_content;
    snapshot.approved = approved != 0;
    snapshot.is_verified = is_verified != 0;
    snapshot.analytics_list = serde_json::from_str(&analytics_json).unwrap_or_default();
    snapshot.security_score = security_score;
    snapshot.ux_score = ux_score;
    snapshot.decent_score = decent_score;
    snapshot.vibes_score = vibes_score;

    let mut product = Product::new(id, submitter_id, snapshot);
    product.current_revision_number = current_revision_number;
    product.last_editor_id = last_editor_id;
    product.created_at = chrono::DateTime::from_timestamp_millis(created_at_ms)
        .unwrap_or_else(chrono::Utc::now);
    product.updated_at = chrono::DateTime::from_timestamp_millis(updated_at_ms)
        .unwrap_or_else(chrono::Utc::now);

    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;

    fn setup_test_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        migrations::apply_migrations(&mut conn).unwrap();
        conn
    }

    fn sample_product(id: &str) -> Product {
        let mut snapshot = ProductSnapshot::new("Test Product");
        snapshot.short_desc = "A test".to_string();
        snapshot.analytics_list = vec!["dune".to_string()];
        snapshot.security_score = 0.5;
        Product::new(id.to_string(), Some("user-1".to_string()), snapshot)
    }

    #[test]
    fn test_insert_and_get_product() {
        let mut conn = setup_test_db();
        let product = sample_product("prod-1");

        let tx = conn.transaction().unwrap();
        insert_product_tx(&tx, &product).unwrap();
        tx.commit().unwrap();

        let retrieved = get_current(&conn, "prod-1")
            .unwrap()
            .expect("product should exist");

        assert_eq!(retrieved.id, "prod-1");
        assert_eq!(retrieved.snapshot.title, "Test Product");
        assert_eq!(retrieved.snapshot.analytics_list, vec!["dune".to_string()]);
        assert_eq!(retrieved.current_revision_number, 1);
        assert_eq!(retrieved.last_editor_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_get_unknown_product_returns_none() {
        let conn = setup_test_db();
        assert!(get_current(&conn, "nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_update_with_matching_guard_succeeds() {
        let mut conn = setup_test_db();
        let product = sample_product("prod-1");

        let tx = conn.transaction().unwrap();
        insert_product_tx(&tx, &product).unwrap();
        tx.commit().unwrap();

        let mut snapshot = product.snapshot.clone();
        snapshot.title = "Updated".to_string();

        let tx = conn.transaction().unwrap();
        let updated =
            update_current_tx(&tx, "prod-1", &snapshot, 2, Some("user-2"), 1_000, 1).unwrap();
        tx.commit().unwrap();

        assert!(updated);
        let retrieved = get_current(&conn, "prod-1").unwrap().unwrap();
        assert_eq!(retrieved.snapshot.title, "Updated");
        assert_eq!(retrieved.current_revision_number, 2);
        assert_eq!(retrieved.last_editor_id.as_deref(), Some("user-2"));
    }

    #[test]
    fn test_update_with_stale_guard_is_rejected() {
        let mut conn = setup_test_db();
        let product = sample_product("prod-1");

        let tx = conn.transaction().unwrap();
        insert_product_tx(&tx, &product).unwrap();
        tx.commit().unwrap();

        let snapshot = product.snapshot.clone();
        let tx = conn.transaction().unwrap();
        // Guard expects revision 5 but the row is at 1
        let updated =
            update_current_tx(&tx, "prod-1", &snapshot, 6, None, 1_000, 5).unwrap();
        tx.commit().unwrap();

        assert!(!updated);
        let retrieved = get_current(&conn, "prod-1").unwrap().unwrap();
        assert_eq!(retrieved.current_revision_number, 1);
    }
}
