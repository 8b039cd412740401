//! Master list import merge and staged-stock dating.
//!
//! A master import reconciles externally supplied item records into the
//! catalog: known codes get their master fields overwritten in place (lots,
//! notes, and pricing history survive), unseen codes become fresh items.
//! Either way the item is flagged pending and the imported quantity is
//! staged until a human dates it in the batch expiry editor.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::cell;
use crate::item::{Item, ItemCode, Lot};
use crate::pricing::net_cost;

/// One raw row from a master list file. Field names follow the
/// spreadsheet headers the supplier exports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MasterRow {
    /// Item code cell.
    #[serde(default, rename = "Itemcode")]
    pub itemcode: Option<JsonValue>,
    /// Description cell.
    #[serde(default, rename = "Description")]
    pub description: Option<JsonValue>,
    /// Group classification cell.
    #[serde(default, rename = "Group Desc")]
    pub group: Option<JsonValue>,
    /// Sub-group classification cell.
    #[serde(default, rename = "Sub Group Desc")]
    pub sub_group: Option<JsonValue>,
    /// Brand classification cell.
    #[serde(default, rename = "Brand Desc")]
    pub brand: Option<JsonValue>,
    /// Supplier classification cell.
    #[serde(default, rename = "Kind Desc")]
    pub supplier: Option<JsonValue>,
    /// List unit cost, before discount.
    #[serde(default, rename = "Unitpri")]
    pub unit_price: Option<JsonValue>,
    /// Supplier discount percentage.
    #[serde(default, rename = "UnitDisc %")]
    pub discount: Option<JsonValue>,
    /// Current sale price.
    #[serde(default, rename = "Saleprice")]
    pub sale_price: Option<JsonValue>,
    /// Total quantity on hand per the master list.
    #[serde(default, rename = "Totqty")]
    pub total_qty: Option<JsonValue>,
}

impl MasterRow {
    /// Resolve the raw cells into a typed record.
    ///
    /// A row without a resolvable item code is dropped silently (`None`).
    /// Missing numeric cells default to zero, matching how the import
    /// pipeline has always treated blanks.
    #[must_use]
    pub fn resolve(&self) -> Option<MasterRecord> {
        let code = cell::to_text(self.itemcode.as_ref())?;
        let code = ItemCode::new(&code).ok()?;
        let discount = cell::to_decimal(self.discount.as_ref()).unwrap_or_default();
        let list_cost = cell::to_decimal(self.unit_price.as_ref()).unwrap_or_default();
        Some(MasterRecord {
            code,
            description: text_or_empty(self.description.as_ref()),
            group: text_or_empty(self.group.as_ref()),
            sub_group: text_or_empty(self.sub_group.as_ref()),
            brand: text_or_empty(self.brand.as_ref()),
            supplier: text_or_empty(self.supplier.as_ref()),
            cost_price: net_cost(list_cost, discount),
            discount,
            sale_price: cell::to_decimal(self.sale_price.as_ref()).unwrap_or_default(),
            quantity: cell::to_i64(self.total_qty.as_ref()).unwrap_or_default(),
        })
    }
}

fn text_or_empty(cell: Option<&JsonValue>) -> String {
    cell::to_text(cell).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// A validated master record. `cost_price` is already net of discount -
/// the raw list price is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterRecord {
    /// Catalog code (primary key).
    pub code: ItemCode,
    /// Display description.
    pub description: String,
    /// Group classification.
    pub group: String,
    /// Sub-group classification.
    pub sub_group: String,
    /// Brand classification.
    pub brand: String,
    /// Supplier classification.
    pub supplier: String,
    /// Net, discount-adjusted unit cost.
    pub cost_price: Decimal,
    /// Supplier discount percentage.
    pub discount: Decimal,
    /// Current sale price.
    pub sale_price: Decimal,
    /// Quantity on hand, staged pending an expiry date.
    pub quantity: i64,
}

/// Outcome of a master import merge.
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// The merged catalog: existing items keep their relative order, new
    /// items append at the end.
    pub items: Vec<Item>,
    /// Items created by this import.
    pub new_count: usize,
    /// Items updated by this import.
    pub updated_count: usize,
}

/// Merge resolved master records into the catalog.
///
/// Keyed by item code through an insertion-ordered map, so output ordering
/// is a contract rather than an accident: the existing items' relative
/// order is preserved and new items append in row order. Merging the same
/// unseen code twice yields one item (the second row is an update).
#[must_use]
pub fn merge_master_rows(existing: Vec<Item>, rows: &[MasterRow]) -> MergeReport {
    let mut catalog: IndexMap<ItemCode, Item> = existing
        .into_iter()
        .map(|item| (item.code.clone(), item))
        .collect();

    let mut new_count = 0;
    let mut updated_count = 0;

    for record in rows.iter().filter_map(MasterRow::resolve) {
        if let Some(item) = catalog.get_mut(&record.code) {
            apply_master_fields(item, &record);
            updated_count += 1;
        } else {
            let mut item = Item::new(record.code.clone());
            apply_master_fields(&mut item, &record);
            catalog.insert(record.code.clone(), item);
            new_count += 1;
        }
    }

    MergeReport {
        items: catalog.into_values().collect(),
        new_count,
        updated_count,
    }
}

/// Overwrite an item's master fields from an imported record. Lots, notes,
/// and pricing history are left alone; the import only stages quantity.
fn apply_master_fields(item: &mut Item, record: &MasterRecord) {
    item.description = record.description.clone();
    item.group = record.group.clone();
    item.sub_group = record.sub_group.clone();
    item.brand = record.brand.clone();
    item.supplier = record.supplier.clone();
    item.cost_price = record.cost_price;
    item.discount = record.discount;
    item.sale_price = record.sale_price;
    item.pending_qty = record.quantity;
    item.pending_update = true;
}

/// One dated entry from the batch expiry editor, resolving staged stock
/// into a concrete lot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpiryAssignment {
    /// Catalog code the entry applies to.
    #[serde(rename = "itemId")]
    pub item_code: ItemCode,
    /// Expiry date assigned to the stock.
    pub date: NaiveDate,
    /// Units being dated.
    pub quantity: i64,
}

/// Resolve staged pending quantities into dated lots.
///
/// Each valid entry appends a new lot stamped with `now`; an item that
/// received at least one lot has its staged quantity and pending flag
/// cleared. Entries with non-positive quantities or unknown codes are
/// skipped. Returns the new catalog and the number of entries applied.
#[must_use]
pub fn assign_expiries(
    items: Vec<Item>,
    entries: &[ExpiryAssignment],
    now: DateTime<Utc>,
) -> (Vec<Item>, usize) {
    let mut items = items;
    let mut applied = 0;

    for entry in entries {
        if entry.quantity <= 0 {
            continue;
        }
        let Some(item) = items.iter_mut().find(|item| item.code == entry.item_code) else {
            continue;
        };
        item.lots.push(Lot::new(entry.date, entry.quantity, now));
        item.pending_qty = 0;
        item.pending_update = false;
        applied += 1;
    }

    (items, applied)
}

/// Reset the pending flag and staged quantity on every item.
pub fn clear_pending(items: &mut [Item]) {
    for item in items {
        item.pending_update = false;
        item.pending_qty = 0;
    }
}
