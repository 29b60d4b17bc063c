//! `prodex history` - paginated revision history for a product.

use clap::Args;
use prodex_core::errors::Result;

use super::open_service;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Path to the SQLite database file
    #[arg(long, default_value = "prodex.db")]
    pub db: String,

    /// Product id
    pub product_id: String,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size (0 uses the configured default)
    #[arg(long, default_value_t = 0)]
    pub page_size: u32,
}

pub fn execute(args: HistoryArgs) -> Result<()> {
    let service = open_service(&args.db)?;
    let page = service.get_history(&args.product_id, args.page, args.page_size)?;

    println!(
        "{} revision(s) total, page {} ({} per page)",
        page.total, page.page, page.page_size
    );
    for entry in &page.entries {
        let marker = if entry.major_change { "*" } else { " " };
        println!(
            "{} r{:<4} {:<12} {:<3} change(s)  {}",
            marker,
            entry.revision_number,
            entry.editor_id.as_deref().unwrap_or("<system>"),
            entry.change_count,
            entry.edit_summary.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
