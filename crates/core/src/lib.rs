//! Shelfline Core - Domain model and reconciliation engines.
//!
//! This crate provides the pure logic shared by all Shelfline components:
//! - `store` - JSON document persistence and batch operations
//! - `cli` - Command-line tools for imports, reports, and undo
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no network access. Every engine is a function of
//! (current state, input) to (new state), so it can be tested in isolation
//! and composed by the surrounding collaborator.
//!
//! # Modules
//!
//! - [`item`] - Item catalog model: codes, lots, pricing history
//! - [`reconcile`] - FIFO reconciliation of reported stock balances
//! - [`snapshot`] - Single-slot deep-copy snapshot for one-level undo
//! - [`merge`] - Master list import merge and staged-stock dating
//! - [`categorize`] - Expiry-band bucketing for reporting
//! - [`pricing`] - Pricing rules, markup math, and price history
//! - [`notify`] - Selection of lots inside the reminder window

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod categorize;
pub(crate) mod cell;
pub mod item;
pub mod merge;
pub mod notify;
pub mod pricing;
pub mod reconcile;
pub mod snapshot;

pub use categorize::{CategorizedLot, ExpiryBand, categorize};
pub use item::{Item, ItemCode, ItemCodeError, Lot, PricingHistoryEntry};
pub use merge::{
    ExpiryAssignment, MasterRecord, MasterRow, MergeReport, assign_expiries, clear_pending,
    merge_master_rows,
};
pub use notify::{ReminderLine, expiring_within};
pub use pricing::{
    MarginStatus, PricingRule, apply_price_change, calculate_price, first_match, margin_status,
    net_cost,
};
pub use reconcile::{
    BalanceReport, BalanceRow, BalanceUpdate, LotReconciliation, apply_balance_updates,
    reconcile_lots,
};
pub use snapshot::{NothingToUndo, SnapshotSlot};
