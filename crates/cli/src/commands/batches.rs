//! Import, reconcile, undo, and assign batches.
//!
//! Row files are JSON arrays as handed over by the spreadsheet-parsing
//! collaborator; resolution and per-row skipping happen in the core.

use std::fs;
use std::path::Path;

use shelfline_core::{BalanceRow, ExpiryAssignment, MasterRow};
use shelfline_store::{JsonStore, ops};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Merge a master-list row file into the catalog.
pub fn import_master(store: &JsonStore, rows_path: &Path) -> CommandResult {
    let rows: Vec<MasterRow> = read_rows(rows_path)?;
    let mut doc = store.load()?;
    let summary = ops::import_master(&mut doc, &rows)?;
    store.save(&doc)?;
    tracing::info!(
        new = summary.new_count,
        updated = summary.updated_count,
        "master import complete"
    );
    Ok(())
}

/// Reconcile a balance-update row file against the catalog.
pub fn reconcile(store: &JsonStore, rows_path: &Path) -> CommandResult {
    let rows: Vec<BalanceRow> = read_rows(rows_path)?;
    let mut doc = store.load()?;
    let summary = ops::reconcile_balances(&mut doc, &rows)?;
    store.save(&doc)?;
    tracing::info!(
        processed = summary.processed,
        skipped = summary.skipped,
        "stock balances reconciled"
    );
    Ok(())
}

/// Restore the catalog from the last pre-reconciliation snapshot.
pub fn undo(store: &JsonStore) -> CommandResult {
    let mut doc = store.load()?;
    let restored = ops::undo_last(&mut doc)?;
    store.save(&doc)?;
    tracing::info!(items = restored, "reconciliation undone");
    Ok(())
}

/// Date staged stock from an expiry-entry file.
pub fn assign(store: &JsonStore, entries_path: &Path) -> CommandResult {
    let entries: Vec<ExpiryAssignment> = read_rows(entries_path)?;
    let mut doc = store.load()?;
    let applied = ops::assign_expiries(&mut doc, &entries, chrono::Utc::now());
    store.save(&doc)?;
    tracing::info!(applied, "expiry entries saved");
    Ok(())
}

fn read_rows<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
