//! Shared helpers for engine integration tests.

use prodex_core::model::product::ProductSnapshot;
use prodex_engine::{NewProduct, RevisionService, ServiceConfig};

/// Build a revision service over a fresh in-memory database.
pub fn test_service() -> RevisionService {
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
    prodex_store::migrations::apply_migrations(&mut conn).unwrap();
    RevisionService::new(conn, ServiceConfig::default())
}

/// A snapshot with a title and a security score, everything else empty.
pub fn snapshot(title: &str, security_score: f64) -> ProductSnapshot {
    let mut snapshot = ProductSnapshot::new(title);
    snapshot.security_score = security_score;
    snapshot
}

/// Create a product with a fixed id and return the id.
pub fn seed_product(service: &RevisionService, id: &str, title: &str) -> String {
    let product = service
        .create_initial_revision(
            NewProduct {
                id: Some(id.to_string()),
                snapshot: snapshot(title, 0.5),
            },
            Some("user-1".to_string()),
        )
        .unwrap();
    product.id
}
