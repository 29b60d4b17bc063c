//! Prodex CLI
//!
//! Command-line interface for the product revision engine

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "prodex")]
#[command(about = "Prodex - product revision & diff engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Initialize (or migrate) the database
    Init(commands::init::InitArgs),
    /// Submit an accepted change payload through the moderation gate
    Submit(commands::submit::SubmitArgs),
    /// Show a product's revision history
    History(commands::history::HistoryArgs),
    /// Revision operations (show, compare, revert, recent feed)
    Revision(commands::revision::RevisionArgs),
}

fn main() {
    prodex_core::logging::init(prodex_core::logging::Profile::Development);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Submit(args) => commands::submit::execute(args),
        Commands::History(args) => commands::history::execute(args),
        Commands::Revision(args) => commands::revision::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
