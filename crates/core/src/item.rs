//! Item catalog domain model: codes, lots, and pricing history.
//!
//! Serde field names match the persisted JSON document produced by earlier
//! versions of the system (`expiryEntries`, `isUpdate`, `pendingStockQty`,
//! ...), so existing documents load unchanged. Every field that newer
//! revisions added carries a serde default for the same reason.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing an [`ItemCode`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemCodeError {
    /// The code was empty or whitespace-only.
    #[error("item code must be non-empty")]
    Empty,
}

/// Externally assigned item code - the catalog's primary key.
///
/// Always trimmed and non-empty. Construct via [`ItemCode::new`], which
/// enforces both; deserialization goes through the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemCode(String);

impl ItemCode {
    /// Create a code from raw input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ItemCodeError::Empty`] if nothing remains after trimming.
    pub fn new(raw: &str) -> Result<Self, ItemCodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ItemCodeError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ItemCode {
    type Error = ItemCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ItemCode> for String {
    fn from(code: ItemCode) -> Self {
        code.0
    }
}

/// One dated batch (lot) of an item's stock.
///
/// `added_at` is the lot's identity key within its item: multiple lots may
/// share an expiry date, but each records its own creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Expiry date of this batch.
    pub date: NaiveDate,
    /// Units in this batch. Positive while the lot exists; reconciliation
    /// removes a lot rather than persisting it at zero.
    pub quantity: i64,
    /// When the lot was recorded.
    pub added_at: DateTime<Utc>,
}

impl Lot {
    /// Create a lot.
    #[must_use]
    pub const fn new(date: NaiveDate, quantity: i64, added_at: DateTime<Utc>) -> Self {
        Self {
            date,
            quantity,
            added_at,
        }
    }
}

/// One resolved price change, newest first in [`Item::pricing_history`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingHistoryEntry {
    /// When the price change was saved.
    pub date: DateTime<Utc>,
    /// The sale price that was applied.
    pub new_price: Decimal,
    /// Rule id, or a `Manual: N%` label for ad-hoc markups.
    pub rule_applied: String,
    /// Whether `new_price` includes VAT.
    pub includes_vat: bool,
}

/// A catalog item with its lots, classification, and derived pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item code (primary key).
    #[serde(rename = "id")]
    pub code: ItemCode,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Group classification.
    #[serde(default)]
    pub group: String,
    /// Sub-group classification.
    #[serde(default, rename = "subGroup")]
    pub sub_group: String,
    /// Brand classification.
    #[serde(default)]
    pub brand: String,
    /// Supplier classification.
    #[serde(default, rename = "supplierDescription")]
    pub supplier: String,
    /// Net unit cost, already discount-adjusted.
    #[serde(default, rename = "costPrice")]
    pub cost_price: Decimal,
    /// Supplier discount percentage applied to the list cost.
    #[serde(default)]
    pub discount: Decimal,
    /// Current sale price.
    #[serde(default, rename = "salePrice")]
    pub sale_price: Decimal,
    /// Dated stock batches, owned exclusively by this item.
    #[serde(default, rename = "expiryEntries")]
    pub lots: Vec<Lot>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Price changes, newest first.
    #[serde(default, rename = "pricingHistory")]
    pub pricing_history: Vec<PricingHistoryEntry>,
    /// Set when an import touched this item and a human still has to
    /// review it (typically to date staged stock).
    #[serde(default, rename = "isUpdate")]
    pub pending_update: bool,
    /// Stock known to exist from a balance report but not yet assigned an
    /// expiry date.
    #[serde(default, rename = "pendingStockQty")]
    pub pending_qty: i64,
}

impl Item {
    /// Create an empty item: no lots, notes, or history.
    #[must_use]
    pub fn new(code: ItemCode) -> Self {
        Self {
            code,
            description: String::new(),
            group: String::new(),
            sub_group: String::new(),
            brand: String::new(),
            supplier: String::new(),
            cost_price: Decimal::ZERO,
            discount: Decimal::ZERO,
            sale_price: Decimal::ZERO,
            lots: Vec::new(),
            notes: String::new(),
            pricing_history: Vec::new(),
            pending_update: false,
            pending_qty: 0,
        }
    }

    /// Total units across all lots.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.lots.iter().map(|lot| lot.quantity).sum()
    }
}
