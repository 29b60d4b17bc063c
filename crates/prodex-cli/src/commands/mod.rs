//! CLI subcommand implementations.

pub mod history;
pub mod init;
pub mod revision;
pub mod submit;

use prodex_core::errors::Result;
use prodex_engine::{RevisionService, ServiceConfig};

/// Open the database, apply migrations, and wrap it in a revision service.
pub fn open_service(db_path: &str) -> Result<RevisionService> {
    let conn = prodex_store::db::open(db_path)?;
    prodex_store::db::configure(&conn)?;
    let mut conn = conn;
    prodex_store::migrations::apply_migrations(&mut conn)?;

    let config = ServiceConfig {
        db_path: db_path.to_string(),
        ..ServiceConfig::default()
    };
    Ok(RevisionService::new(conn, config))
}
