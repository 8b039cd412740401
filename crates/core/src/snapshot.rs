//! Single-slot snapshot of the item catalog for one-level undo.
//!
//! A reconciliation batch captures the full catalog here before mutating
//! anything; undo restores that copy verbatim. The slot is deliberately
//! single and process-wide: only the most recent batch is undoable, and the
//! next batch silently overwrites an unconsumed snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::Item;

/// Recoverable condition: undo was requested with no snapshot armed.
///
/// This is a normal state (nothing was reconciled, or the snapshot was
/// already consumed), not corruption. Current state is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("nothing to undo")]
pub struct NothingToUndo;

/// The single pre-reconciliation snapshot slot.
///
/// Serializes as the document's `backup` field: `null` when empty,
/// otherwise the snapshotted item array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotSlot {
    snapshot: Option<Vec<Item>>,
}

impl SnapshotSlot {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { snapshot: None }
    }

    /// Whether a snapshot is armed and an undo would succeed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Capture a deep copy of the catalog before a batch mutates it.
    ///
    /// Must be called before any mutation from the batch is applied.
    /// Overwrites any prior unconsumed snapshot. The stored copy is
    /// structurally independent: later mutation of the live items cannot
    /// affect it.
    pub fn begin_batch(&mut self, items: &[Item]) {
        self.snapshot = Some(items.to_vec());
    }

    /// Consume the snapshot, returning it as the new live state.
    ///
    /// The slot is empty afterwards, so a second consecutive undo fails.
    ///
    /// # Errors
    ///
    /// Returns [`NothingToUndo`] if no snapshot is armed.
    pub fn undo(&mut self) -> Result<Vec<Item>, NothingToUndo> {
        self.snapshot.take().ok_or(NothingToUndo)
    }
}
