//! `prodex submit` - push an accepted change payload through the gate.

use std::sync::Arc;

use clap::Args;
use prodex_core::errors::{PxError, PxErrorKind, Result};
use prodex_core::AllowAllPolicy;
use prodex_engine::{GateOutcome, ModerationGate};

use super::open_service;

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Path to the SQLite database file
    #[arg(long, default_value = "prodex.db")]
    pub db: String,

    /// JSON file containing the tagged change payload
    #[arg(long)]
    pub file: String,

    /// Editor identity; omit for a system-originated change
    #[arg(long)]
    pub editor: Option<String>,

    /// Edit summary; synthesized from changed fields when omitted on updates
    #[arg(long)]
    pub summary: Option<String>,
}

pub fn execute(args: SubmitArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file).map_err(|e| {
        PxError::new(PxErrorKind::Io)
            .with_op("submit")
            .with_message(format!("failed to read {}: {}", args.file, e))
    })?;

    let service = open_service(&args.db)?;
    let gate = ModerationGate::new(Arc::new(AllowAllPolicy));

    match gate.apply_accepted_raw(&service, &raw, args.editor, args.summary)? {
        GateOutcome::Created(product) => {
            println!("Created product {} at revision 1", product.id);
        }
        GateOutcome::Applied(outcome) => match outcome {
            prodex_engine::ApplyOutcome::Applied {
                revision_number,
                change_count,
            } => println!(
                "Applied revision {} ({} field(s) changed)",
                revision_number, change_count
            ),
            prodex_engine::ApplyOutcome::NoChange { revision_number } => println!(
                "No changes against revision {}; nothing written",
                revision_number
            ),
        },
    }

    Ok(())
}
