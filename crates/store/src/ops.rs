//! Batch operations over the document.
//!
//! These wrap the pure core engines with the snapshot bracket, counters,
//! and logging. Each runs to completion against one in-memory document;
//! the caller persists the result as a whole (or not at all).

use chrono::{DateTime, Utc};
use shelfline_core::{
    BalanceRow, BalanceUpdate, ExpiryAssignment, Item, MasterRow, NothingToUndo, PricingRule,
    apply_balance_updates, assign_expiries as assign_expiry_lots, merge_master_rows,
};
use thiserror::Error;

use crate::document::Document;

/// Batch-level failures, distinct from per-row skips.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    /// Not a single row in the uploaded batch was valid.
    #[error("no valid items found in batch")]
    NoValidRows,
    /// Undo was requested with no snapshot armed.
    #[error(transparent)]
    NothingToUndo(#[from] NothingToUndo),
}

/// Counts reported after a reconcile batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Rows applied to a catalog item.
    pub processed: usize,
    /// Rows whose code was not in the catalog.
    pub skipped: usize,
}

/// Counts reported after a master import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Items created.
    pub new_count: usize,
    /// Items updated.
    pub updated_count: usize,
}

/// Apply a balance-update batch with the snapshot bracket.
///
/// Malformed rows were already dropped by row resolution; if nothing
/// valid remains the batch fails as a whole and the document is untouched.
/// Otherwise the catalog is snapshotted into the backup slot before any
/// mutation, then reconciled.
///
/// # Errors
///
/// Returns [`BatchError::NoValidRows`] when no row resolves.
pub fn reconcile_balances(
    doc: &mut Document,
    rows: &[BalanceRow],
) -> Result<ReconcileSummary, BatchError> {
    let updates: Vec<BalanceUpdate> = rows.iter().filter_map(BalanceRow::resolve).collect();
    if updates.is_empty() {
        return Err(BatchError::NoValidRows);
    }

    // Snapshot strictly before the first mutation, so a later undo (or an
    // aborted persist) can never observe a half-applied batch.
    doc.backup.begin_batch(&doc.items);

    let items = std::mem::take(&mut doc.items);
    let (items, report) = apply_balance_updates(items, &updates);
    doc.items = items;

    let dropped = rows.len() - updates.len();
    tracing::info!(
        processed = report.processed,
        skipped = report.skipped,
        dropped,
        "balance batch reconciled"
    );
    Ok(ReconcileSummary {
        processed: report.processed,
        skipped: report.skipped,
    })
}

/// Restore the catalog from the backup slot, consuming it.
///
/// Returns the restored item count.
///
/// # Errors
///
/// Returns [`BatchError::NothingToUndo`] when the slot is empty; the
/// document is left untouched.
pub fn undo_last(doc: &mut Document) -> Result<usize, BatchError> {
    let restored = doc.backup.undo()?;
    let count = restored.len();
    doc.items = restored;
    tracing::info!(items = count, "last reconcile batch undone");
    Ok(count)
}

/// Merge a master list into the catalog.
///
/// # Errors
///
/// Returns [`BatchError::NoValidRows`] when no row resolves an item code.
pub fn import_master(doc: &mut Document, rows: &[MasterRow]) -> Result<ImportSummary, BatchError> {
    if !rows.iter().any(|row| row.resolve().is_some()) {
        return Err(BatchError::NoValidRows);
    }

    let items = std::mem::take(&mut doc.items);
    let report = merge_master_rows(items, rows);
    doc.items = report.items;

    tracing::info!(
        new = report.new_count,
        updated = report.updated_count,
        "master list imported"
    );
    Ok(ImportSummary {
        new_count: report.new_count,
        updated_count: report.updated_count,
    })
}

/// Date staged stock from the batch expiry editor. Returns the number of
/// entries applied.
pub fn assign_expiries(
    doc: &mut Document,
    entries: &[ExpiryAssignment],
    now: DateTime<Utc>,
) -> usize {
    let items = std::mem::take(&mut doc.items);
    let (items, applied) = assign_expiry_lots(items, entries, now);
    doc.items = items;
    tracing::info!(applied, "expiry entries saved");
    applied
}

/// Replace the catalog and pricing rules after a pricing save.
///
/// The pricing editor works on a full copy of both, so the save is a
/// wholesale replacement, not a merge.
pub fn save_pricing(doc: &mut Document, items: Vec<Item>, rules: Vec<PricingRule>) {
    doc.items = items;
    doc.pricing_rules = rules;
    tracing::info!(
        items = doc.items.len(),
        rules = doc.pricing_rules.len(),
        "pricing changes saved"
    );
}
