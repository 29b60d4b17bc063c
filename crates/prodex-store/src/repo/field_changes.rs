//! Field-change recorder: the queryable per-field index of a revision's diff.
//!
//! Rows are written once, inside the revision service's write transaction,
//! and read back ordered by field name to keep display deterministic.

use crate::errors::{from_rusqlite, Result};
use prodex_core::diff::model::{ChangeType, FieldChange};
use rusqlite::{Connection, Transaction};

/// Persist a revision's field changes inside the caller's transaction.
pub fn store_tx(tx: &Transaction, revision_id: &str, changes: &[FieldChange]) -> Result<()> {
    for change in changes {
        tx.execute(
            "INSERT INTO product_field_changes
                (id, revision_id, field_name, old_value, new_value, change_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                uuid::Uuid::now_v7().to_string(),
                revision_id,
                change.field_name,
                change.old_value,
                change.new_value,
                change.change_type.as_str(),
            ],
        )
        .map_err(from_rusqlite)?;
    }

    Ok(())
}

/// Load the field changes belonging to a revision, ordered by field name.
pub fn load(conn: &Connection, revision_id: &str) -> Result<Vec<FieldChange>> {
    let mut stmt = conn
        .prepare(
            "SELECT field_name, old_value, new_value, change_type
             FROM product_field_changes
             WHERE revision_id = ?1
             ORDER BY field_name",
        )
        .map_err(from_rusqlite)?;

    let changes = stmt
        .query_map([revision_id], |row| {
            let field_name: String = row.get(0)?;
            let old_value: Option<String> = row.get(1)?;
            let new_value: Option<String> = row.get(2)?;
            let change_type_str: String = row.get(3)?;
            Ok((field_name, old_value, new_value, change_type_str))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?
        .into_iter()
        .map(|(field_name, old_value, new_value, change_type_str)| {
            // The CHECK constraint keeps unknown values out; Modified is the
            // safe reading if a foreign row ever appears.
            let change_type =
                ChangeType::parse(&change_type_str).unwrap_or(ChangeType::Modified);
            FieldChange {
                field_name,
                old_value,
                new_value,
                change_type,
            }
        })
        .collect();

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;
    use crate::repo::{product_repo, revision_repo};
    use prodex_core::model::product::{Product, ProductSnapshot};

    fn setup_with_revision() -> (Connection, String) {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        migrations::apply_migrations(&mut conn).unwrap();

        let product = Product::new(
            "prod-1".to_string(),
            None,
            ProductSnapshot::new("Test"),
        );
        let tx = conn.transaction().unwrap();
        product_repo::insert_product_tx(&tx, &product).unwrap();
        let revision_id = revision_repo::append_revision_tx(
            &tx,
            "prod-1",
            1,
            None,
            Some("Initial product version"),
            &[],
            &product.snapshot,
            0,
        )
        .unwrap();
        tx.commit().unwrap();

        (conn, revision_id)
    }

    fn change(field: &str, old: Option<&str>, new: Option<&str>, ct: ChangeType) -> FieldChange {
        FieldChange {
            field_name: field.to_string(),
            old_value: old.map(str::to_string),
            new_value: new.map(str::to_string),
            change_type: ct,
        }
    }

    #[test]
    fn test_store_and_load_ordered_by_field_name() {
        let (mut conn, revision_id) = setup_with_revision();

        let changes = vec![
            change("title", Some("A"), Some("B"), ChangeType::Modified),
            change("logo_url", None, Some("https://x"), ChangeType::Added),
            change("short_desc", Some("gone"), None, ChangeType::Removed),
        ];

        let tx = conn.transaction().unwrap();
        store_tx(&tx, &revision_id, &changes).unwrap();
        tx.commit().unwrap();

        let loaded = load(&conn, &revision_id).unwrap();
        let names: Vec<&str> = loaded.iter().map(|c| c.field_name.as_str()).collect();
        assert_eq!(names, vec!["logo_url", "short_desc", "title"]);

        let logo = &loaded[0];
        assert_eq!(logo.change_type, ChangeType::Added);
        assert!(logo.old_value.is_none());
        assert_eq!(logo.new_value.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_load_for_revision_without_changes_is_empty() {
        let (conn, revision_id) = setup_with_revision();
        assert!(load(&conn, &revision_id).unwrap().is_empty());
    }

    #[test]
    fn test_store_rejects_orphan_revision() {
        let (mut conn, _) = setup_with_revision();
        let changes = vec![change("title", Some("A"), Some("B"), ChangeType::Modified)];

        let tx = conn.transaction().unwrap();
        let result = store_tx(&tx, "no-such-revision", &changes);
        assert!(result.is_err(), "foreign key should reject orphan changes");
    }
}
