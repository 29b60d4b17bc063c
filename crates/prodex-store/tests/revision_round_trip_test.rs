//! Round-trip tests for the revision log on a real on-disk database.
//!
//! Exercises open/configure/migrate plus the three repos composing inside a
//! single transaction, the way the revision service drives them.

use prodex_core::compute_diff;
use prodex_core::model::product::{Product, ProductSnapshot};
use prodex_store::repo::{field_changes, product_repo, revision_repo};
use prodex_store::{db, migrations};

fn open_test_db(dir: &tempfile::TempDir) -> rusqlite::Connection {
    let path = dir.path().join("prodex.db");
    let conn = db::open(&path).unwrap();
    db::configure(&conn).unwrap();
    let mut conn = conn;
    migrations::apply_migrations(&mut conn).unwrap();
    conn
}

#[test]
fn test_full_revision_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = open_test_db(&dir);

    // Baseline: product row + revision 1 in one transaction
    let mut snapshot = ProductSnapshot::new("Ledger");
    snapshot.short_desc = "A product".to_string();
    snapshot.security_score = 0.5;
    let product = Product::new("prod-1".to_string(), Some("user-1".to_string()), snapshot);

    let tx = conn.transaction().unwrap();
    product_repo::insert_product_tx(&tx, &product).unwrap();
    revision_repo::append_revision_tx(
        &tx,
        &product.id,
        1,
        product.submitter_id.as_deref(),
        Some("Initial product version"),
        &[],
        &product.snapshot,
        product.created_at.timestamp_millis(),
    )
    .unwrap();
    tx.commit().unwrap();

    // Second revision: rename + recorded field changes, atomically with the
    // entity-store update
    let mut proposed = product.snapshot.clone();
    proposed.title = "Ledger Pro".to_string();
    let changes = compute_diff(&product.snapshot, &proposed);
    assert_eq!(changes.len(), 1);

    let tx = conn.transaction().unwrap();
    let revision_id = revision_repo::append_revision_tx(
        &tx,
        &product.id,
        2,
        Some("user-2"),
        Some("rename"),
        &changes,
        &proposed,
        1_000,
    )
    .unwrap();
    field_changes::store_tx(&tx, &revision_id, &changes).unwrap();
    let updated = product_repo::update_current_tx(
        &tx,
        &product.id,
        &proposed,
        2,
        Some("user-2"),
        1_000,
        1,
    )
    .unwrap();
    assert!(updated);
    tx.commit().unwrap();

    // Entity store and revision log agree
    let current = product_repo::get_current(&conn, "prod-1").unwrap().unwrap();
    assert_eq!(current.current_revision_number, 2);
    assert_eq!(current.snapshot.title, "Ledger Pro");
    assert_eq!(
        revision_repo::max_revision_number(&conn, "prod-1").unwrap(),
        Some(2)
    );

    // Stored snapshot replays to the current state
    let row = revision_repo::get_revision(&conn, "prod-1", 2)
        .unwrap()
        .unwrap();
    let loaded = field_changes::load(&conn, &row.id).unwrap();
    let revision = row.into_revision(loaded).unwrap();
    assert_eq!(revision.snapshot, current.snapshot);
    assert_eq!(revision.field_changes.len(), 1);
    assert_eq!(revision.field_changes[0].field_name, "title");

    // Revision 1 remains readable and unchanged
    let baseline = revision_repo::get_revision(&conn, "prod-1", 1)
        .unwrap()
        .unwrap();
    assert_eq!(baseline.snapshot().unwrap().title, "Ledger");
}

#[test]
fn test_rolled_back_transaction_leaves_no_partial_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = open_test_db(&dir);

    let product = Product::new("prod-1".to_string(), None, ProductSnapshot::new("Keep"));
    let tx = conn.transaction().unwrap();
    product_repo::insert_product_tx(&tx, &product).unwrap();
    revision_repo::append_revision_tx(
        &tx,
        &product.id,
        1,
        None,
        Some("Initial product version"),
        &[],
        &product.snapshot,
        0,
    )
    .unwrap();
    tx.commit().unwrap();

    // Append a revision but drop the transaction without committing
    {
        let tx = conn.transaction().unwrap();
        revision_repo::append_revision_tx(
            &tx,
            &product.id,
            2,
            None,
            Some("doomed"),
            &[],
            &product.snapshot,
            1,
        )
        .unwrap();
        // dropped here: rollback
    }

    assert_eq!(
        revision_repo::max_revision_number(&conn, "prod-1").unwrap(),
        Some(1),
        "no orphan revision may survive a rollback"
    );
    let current = product_repo::get_current(&conn, "prod-1").unwrap().unwrap();
    assert_eq!(current.current_revision_number, 1);
}
