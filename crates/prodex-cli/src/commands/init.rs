//! `prodex init` - create or migrate the database.

use clap::Args;
use prodex_core::errors::Result;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path to the SQLite database file
    #[arg(long, default_value = "prodex.db")]
    pub db: String,
}

pub fn execute(args: InitArgs) -> Result<()> {
    let conn = prodex_store::db::open(&args.db)?;
    prodex_store::db::configure(&conn)?;
    let mut conn = conn;
    prodex_store::migrations::apply_migrations(&mut conn)?;
    println!("Database ready at {}", args.db);
    Ok(())
}
