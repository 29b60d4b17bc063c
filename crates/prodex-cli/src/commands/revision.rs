//! `prodex revision` - show, compare, revert, and the recent-edits feed.

use clap::{Args, Subcommand};
use prodex_core::diff::human_summary::render_human_summary;
use prodex_core::errors::Result;

use super::open_service;

#[derive(Debug, Args)]
pub struct RevisionArgs {
    /// Path to the SQLite database file
    #[arg(long, default_value = "prodex.db")]
    pub db: String,

    #[command(subcommand)]
    pub command: RevisionCommand,
}

#[derive(Debug, Subcommand)]
pub enum RevisionCommand {
    /// Print one full revision as JSON
    Show {
        product_id: String,
        revision_number: u32,
    },
    /// Compare two revisions (order is not normalized)
    Compare {
        product_id: String,
        from: u32,
        to: u32,
    },
    /// Revert a product to a prior revision (creates a forward revision)
    Revert {
        product_id: String,
        target: u32,
        #[arg(long)]
        editor: Option<String>,
        #[arg(long)]
        reason: String,
    },
    /// Cross-product feed of recent edits
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

pub fn execute(args: RevisionArgs) -> Result<()> {
    let service = open_service(&args.db)?;

    match args.command {
        RevisionCommand::Show {
            product_id,
            revision_number,
        } => {
            let revision = service.get_revision(&product_id, revision_number)?;
            println!("{}", serde_json::to_string_pretty(&revision)?);
        }
        RevisionCommand::Compare {
            product_id,
            from,
            to,
        } => {
            let diff = service.compare(&product_id, from, to)?;
            print!("{}", render_human_summary(&diff));
        }
        RevisionCommand::Revert {
            product_id,
            target,
            editor,
            reason,
        } => match service.revert(&product_id, target, editor, &reason)? {
            prodex_engine::ApplyOutcome::Applied {
                revision_number, ..
            } => println!("Reverted; new revision {}", revision_number),
            prodex_engine::ApplyOutcome::NoChange { revision_number } => println!(
                "Target equals current state (revision {}); nothing written",
                revision_number
            ),
        },
        RevisionCommand::Recent { limit } => {
            for edit in service.recent_edits(limit)? {
                println!(
                    "{} r{:<4} {:<20} {}",
                    edit.product_id.as_deref().unwrap_or("?"),
                    edit.revision_number,
                    edit.product_title.as_deref().unwrap_or(""),
                    edit.edit_summary.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}
