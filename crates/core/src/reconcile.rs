//! FIFO reconciliation of externally reported stock balances.
//!
//! A balance-update batch carries one total figure per item code. The
//! engine adjusts that item's lots so they sum to the reported figure:
//! shrinkage consumes the oldest-dated lots first (oldest stock is assumed
//! to sell first), growth is staged as a pending quantity until a human
//! assigns it an expiry date. Everything here is a pure transformation -
//! input collections are never mutated.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::cell;
use crate::item::{Item, ItemCode, Lot};

/// Outcome of reconciling one item's lots against a reported balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotReconciliation {
    /// The new lot set. Sums to the reported balance on shrinkage;
    /// unchanged on equality or growth.
    pub lots: Vec<Lot>,
    /// Stock reported beyond the current lot total, to be staged for
    /// later dating. Zero unless the balance grew.
    pub pending_delta: i64,
}

/// Reconcile an item's lots against `reported_balance`.
///
/// - Equal: lots are returned unchanged, in their original order.
/// - Shrinkage: lots are sorted ascending by expiry date (ties keep
///   `added_at` order) and consumed oldest-first until the deficit is
///   covered. A partially consumed lot keeps its date and timestamp with a
///   reduced quantity; fully consumed lots are dropped.
/// - Growth: lots are returned unchanged and the surplus comes back as
///   `pending_delta`. No lot is fabricated, because a balance figure
///   carries no expiry date.
#[must_use]
pub fn reconcile_lots(lots: &[Lot], reported_balance: i64) -> LotReconciliation {
    let current_total: i64 = lots.iter().map(|lot| lot.quantity).sum();

    if reported_balance >= current_total {
        return LotReconciliation {
            lots: lots.to_vec(),
            pending_delta: reported_balance - current_total,
        };
    }

    let mut ordered = lots.to_vec();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.added_at.cmp(&b.added_at)));

    let mut to_remove = current_total - reported_balance;
    let mut remaining = Vec::with_capacity(ordered.len());
    for mut lot in ordered {
        if to_remove <= 0 {
            remaining.push(lot);
        } else if lot.quantity <= to_remove {
            to_remove -= lot.quantity;
        } else {
            lot.quantity -= to_remove;
            to_remove = 0;
            remaining.push(lot);
        }
    }

    LotReconciliation {
        lots: remaining,
        pending_delta: 0,
    }
}

/// One raw row from a balance-update file, as produced by the external
/// row collaborator. Field names follow the spreadsheet headers.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRow {
    /// Item code cell, possibly missing or padded.
    #[serde(default, rename = "Itemcode")]
    pub itemcode: Option<JsonValue>,
    /// Reported total balance cell, possibly missing or non-numeric.
    #[serde(default)]
    pub balance: Option<JsonValue>,
}

impl BalanceRow {
    /// Resolve the raw cells into a typed update.
    ///
    /// Rows with a missing/empty code or a missing/non-numeric balance are
    /// excluded from the batch (`None`); they are not an error.
    #[must_use]
    pub fn resolve(&self) -> Option<BalanceUpdate> {
        let code = cell::to_text(self.itemcode.as_ref())?;
        let code = ItemCode::new(&code).ok()?;
        let balance = cell::to_i64(self.balance.as_ref())?;
        Some(BalanceUpdate {
            item_code: code,
            balance,
        })
    }
}

/// A validated balance update for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceUpdate {
    /// Catalog code the balance applies to.
    pub item_code: ItemCode,
    /// Externally reported total balance.
    pub balance: i64,
}

/// Counts reported back to the caller after a balance batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceReport {
    /// Updates applied to a catalog item.
    pub processed: usize,
    /// Updates whose code was not in the catalog (skipped silently).
    pub skipped: usize,
}

/// Apply a batch of balance updates to the catalog.
///
/// Returns the new catalog plus counts. Items keep their relative order;
/// updates referencing unknown codes are skipped without touching anything.
/// Growth accumulates into the item's pending staged quantity and marks it
/// as pending review.
#[must_use]
pub fn apply_balance_updates(items: Vec<Item>, updates: &[BalanceUpdate]) -> (Vec<Item>, BalanceReport) {
    let mut items = items;
    let mut report = BalanceReport::default();

    for update in updates {
        let Some(item) = items.iter_mut().find(|item| item.code == update.item_code) else {
            report.skipped += 1;
            continue;
        };
        let outcome = reconcile_lots(&item.lots, update.balance);
        item.lots = outcome.lots;
        if outcome.pending_delta > 0 {
            item.pending_qty += outcome.pending_delta;
            item.pending_update = true;
        }
        report.processed += 1;
    }

    (items, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn date(offset_days: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date") + Duration::days(offset_days)
    }

    fn lot(offset_days: i64, quantity: i64, added_minute: u32) -> Lot {
        Lot::new(
            date(offset_days),
            quantity,
            Utc.with_ymd_and_hms(2026, 8, 1, 9, added_minute, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    fn item(code: &str, lots: Vec<Lot>) -> Item {
        let mut item = Item::new(ItemCode::new(code).expect("valid code"));
        item.lots = lots;
        item
    }

    #[test]
    fn test_equality_is_a_no_op() {
        let lots = vec![lot(40, 8, 0), lot(10, 5, 1)];
        let outcome = reconcile_lots(&lots, 13);
        // Not even re-sorted: byte-for-byte unchanged.
        assert_eq!(outcome.lots, lots);
        assert_eq!(outcome.pending_delta, 0);
    }

    #[test]
    fn test_shrinkage_consumes_oldest_first() {
        // Lots [+10d qty 5, +40d qty 8], balance 7: the +10d lot goes
        // entirely and the +40d lot is trimmed to 6.
        let lots = vec![lot(10, 5, 0), lot(40, 8, 1)];
        let outcome = reconcile_lots(&lots, 7);
        assert_eq!(outcome.lots.len(), 1);
        assert_eq!(outcome.lots[0].date, date(40));
        assert_eq!(outcome.lots[0].quantity, 6);
        assert_eq!(outcome.pending_delta, 0);
    }

    #[test]
    fn test_shrinkage_conserves_reported_total() {
        let lots = vec![lot(5, 3, 0), lot(20, 7, 1), lot(90, 11, 2)];
        for balance in 0..=21 {
            let outcome = reconcile_lots(&lots, balance);
            let total: i64 = outcome.lots.iter().map(|l| l.quantity).sum();
            assert_eq!(total, balance, "balance {balance}");
        }
    }

    #[test]
    fn test_shrinkage_removal_respects_date_order() {
        let lots = vec![lot(90, 11, 0), lot(5, 3, 1), lot(20, 7, 2)];
        let outcome = reconcile_lots(&lots, 12);
        // 3 + 6 removed: the +5d lot goes entirely, the +20d lot is
        // trimmed, the +90d lot is untouched.
        assert_eq!(
            outcome
                .lots
                .iter()
                .map(|l| (l.date, l.quantity))
                .collect::<Vec<_>>(),
            vec![(date(20), 1), (date(90), 11)]
        );
    }

    #[test]
    fn test_shrinkage_same_date_lots_consume_in_added_order() {
        let older = lot(10, 4, 0);
        let newer = lot(10, 4, 30);
        let outcome = reconcile_lots(&[newer.clone(), older], 4);
        assert_eq!(outcome.lots, vec![newer]);
    }

    #[test]
    fn test_shrinkage_to_zero_removes_all_lots() {
        let lots = vec![lot(10, 5, 0), lot(40, 8, 1)];
        let outcome = reconcile_lots(&lots, 0);
        assert!(outcome.lots.is_empty());
    }

    #[test]
    fn test_growth_stages_delta_without_fabricating_lots() {
        // Balance 20 against total 13 leaves the lots alone and stages 7.
        let lots = vec![lot(10, 5, 0), lot(40, 8, 1)];
        let outcome = reconcile_lots(&lots, 20);
        assert_eq!(outcome.lots, lots);
        assert_eq!(outcome.pending_delta, 7);
    }

    #[test]
    fn test_apply_updates_growth_accumulates_pending() {
        let items = vec![item("A1", vec![lot(10, 5, 0)])];
        let updates = vec![
            BalanceUpdate {
                item_code: ItemCode::new("A1").expect("valid code"),
                balance: 9,
            },
            BalanceUpdate {
                item_code: ItemCode::new("A1").expect("valid code"),
                balance: 12,
            },
        ];
        let (items, report) = apply_balance_updates(items, &updates);
        assert_eq!(report.processed, 2);
        assert_eq!(items[0].pending_qty, 4 + 7);
        assert!(items[0].pending_update);
        assert_eq!(items[0].total_quantity(), 5);
    }

    #[test]
    fn test_apply_updates_skips_unknown_codes() {
        let items = vec![item("A1", vec![lot(10, 5, 0)])];
        let updates = vec![BalanceUpdate {
            item_code: ItemCode::new("GHOST").expect("valid code"),
            balance: 2,
        }];
        let (items, report) = apply_balance_updates(items, &updates);
        assert_eq!(report.processed, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(items[0].total_quantity(), 5);
    }

    #[test]
    fn test_apply_updates_preserves_item_order() {
        let items = vec![item("A1", vec![]), item("B2", vec![]), item("C3", vec![])];
        let updates = vec![BalanceUpdate {
            item_code: ItemCode::new("B2").expect("valid code"),
            balance: 4,
        }];
        let (items, _) = apply_balance_updates(items, &updates);
        let codes: Vec<_> = items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn test_balance_row_resolution() {
        let row: BalanceRow =
            serde_json::from_value(serde_json::json!({ "Itemcode": " A1 ", "balance": 7 }))
                .expect("valid row");
        let update = row.resolve().expect("resolvable");
        assert_eq!(update.item_code.as_str(), "A1");
        assert_eq!(update.balance, 7);

        // Spreadsheet cells often arrive as strings.
        let row: BalanceRow =
            serde_json::from_value(serde_json::json!({ "Itemcode": "A1", "balance": "12" }))
                .expect("valid row");
        assert_eq!(row.resolve().expect("resolvable").balance, 12);

        // Missing code or non-numeric balance drops the row, not the batch.
        let row: BalanceRow =
            serde_json::from_value(serde_json::json!({ "balance": 7 })).expect("valid row");
        assert!(row.resolve().is_none());
        let row: BalanceRow =
            serde_json::from_value(serde_json::json!({ "Itemcode": "A1", "balance": "n/a" }))
                .expect("valid row");
        assert!(row.resolve().is_none());
        let row: BalanceRow =
            serde_json::from_value(serde_json::json!({ "Itemcode": "  ", "balance": 7 }))
                .expect("valid row");
        assert!(row.resolve().is_none());
    }
}
