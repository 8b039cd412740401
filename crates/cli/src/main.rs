//! Shelfline CLI - operate on the inventory document from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Expiry-band report for today
//! shelfline report
//!
//! # Merge a master list (pre-parsed rows as JSON)
//! shelfline import master-rows.json
//!
//! # Reconcile reported balances, then change your mind
//! shelfline reconcile balance-rows.json
//! shelfline undo
//!
//! # Date staged stock and run the reminder sweep
//! shelfline assign entries.json
//! shelfline sweep
//! ```
//!
//! The document path comes from `--db`, the `SHELFLINE_DB_PATH`
//! environment variable, or defaults to `inventory-db.json`. Row files are
//! JSON arrays produced by the spreadsheet-parsing collaborator; this
//! binary never parses spreadsheets itself.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelfline_store::JsonStore;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod commands;

const DB_PATH_ENV: &str = "SHELFLINE_DB_PATH";
const DEFAULT_DB_PATH: &str = "inventory-db.json";

#[derive(Parser)]
#[command(name = "shelfline")]
#[command(author, version, about = "Shelfline inventory tools")]
struct Cli {
    /// Path to the inventory document (overrides SHELFLINE_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expiry-band report for the catalog
    Report {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<chrono::NaiveDate>,
    },
    /// Merge a master list of pre-parsed rows into the catalog
    Import {
        /// JSON file with an array of master rows
        rows: PathBuf,
    },
    /// Reconcile reported stock balances against the catalog
    Reconcile {
        /// JSON file with an array of balance rows
        rows: PathBuf,
    },
    /// Undo the last reconcile batch
    Undo,
    /// Date staged stock from a batch of expiry entries
    Assign {
        /// JSON file with an array of expiry entries
        entries: PathBuf,
    },
    /// Run the reminder sweep once
    Sweep,
    /// Mark a notification as read
    MarkRead {
        /// Notification id
        id: Uuid,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli
        .db
        .or_else(|| std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
    let store = JsonStore::new(path);

    match cli.command {
        Commands::Report { as_of } => commands::report::expiry_report(&store, as_of)?,
        Commands::Import { rows } => commands::batches::import_master(&store, &rows)?,
        Commands::Reconcile { rows } => commands::batches::reconcile(&store, &rows)?,
        Commands::Undo => commands::batches::undo(&store)?,
        Commands::Assign { entries } => commands::batches::assign(&store, &entries)?,
        Commands::Sweep => commands::notifications::sweep(&store)?,
        Commands::MarkRead { id } => commands::notifications::mark_read(&store, id)?,
    }
    Ok(())
}
