//! Shelfline Store - the storage collaborator around the core engines.
//!
//! Owns the single persisted JSON document (items, settings, notifications,
//! pricing rules, and the backup slot) and the batch operations that
//! bracket the core engines with snapshot capture, persistence, and
//! logging. Execution is single-writer and request-scoped: each operation
//! mutates one in-memory document and the caller persists it as a whole.
//!
//! # Modules
//!
//! - [`document`] - Persisted document shape and settings defaults
//! - [`store`] - Atomic JSON file load/save
//! - [`notify`] - Notification records and the reminder sweep
//! - [`ops`] - Batch operations: reconcile, undo, import, assign, pricing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod document;
pub mod notify;
pub mod ops;
pub mod store;

pub use document::{Document, Settings};
pub use notify::{
    Notification, NotificationError, NotificationKind, build_reminder, mark_read, sweep_reminders,
};
pub use ops::{
    BatchError, ImportSummary, ReconcileSummary, assign_expiries, import_master,
    reconcile_balances, save_pricing, undo_last,
};
pub use store::{JsonStore, StoreError};
