//! Pricing rules, markup math, and price history.
//!
//! Rules are matching predicates, independent of items: each optional field
//! must equal the item's corresponding classification, an absent (or empty)
//! field is a wildcard. Rules resolve at read time; only applied price
//! changes are stored, as history entries on the item.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::{Item, PricingHistoryEntry};

/// VAT factor baked into the markup formula (11%).
const VAT_FACTOR: Decimal = Decimal::from_parts(111, 0, 0, false, 2);

/// Hundred, for percentage conversions.
const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// A pricing rule: a matching predicate plus a markup percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    /// Rule identity.
    pub id: Uuid,
    /// Supplier matcher; absent or empty matches any supplier.
    #[serde(default)]
    pub supplier: Option<String>,
    /// Group matcher.
    #[serde(default)]
    pub category: Option<String>,
    /// Sub-group matcher.
    #[serde(default)]
    pub sub_category: Option<String>,
    /// Brand matcher.
    #[serde(default)]
    pub brand: Option<String>,
    /// Markup percentage applied to net cost.
    pub percentage: Decimal,
}

impl PricingRule {
    /// Whether this rule applies to `item`.
    ///
    /// Every present, non-empty matcher field must equal the item's
    /// corresponding classification.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        field_matches(self.supplier.as_deref(), &item.supplier)
            && field_matches(self.category.as_deref(), &item.group)
            && field_matches(self.sub_category.as_deref(), &item.sub_group)
            && field_matches(self.brand.as_deref(), &item.brand)
    }
}

fn field_matches(matcher: Option<&str>, value: &str) -> bool {
    match matcher {
        None | Some("") => true,
        Some(expected) => expected == value,
    }
}

/// First rule in declaration order that matches `item`.
#[must_use]
pub fn first_match<'a>(rules: &'a [PricingRule], item: &Item) -> Option<&'a PricingRule> {
    rules.iter().find(|rule| rule.matches(item))
}

/// Net, discount-adjusted cost: `list_cost * (1 - discount/100)`.
///
/// This is the value stored as an item's cost - the raw list price never
/// lands in the catalog.
#[must_use]
pub fn net_cost(list_cost: Decimal, discount_percent: Decimal) -> Decimal {
    list_cost * (Decimal::ONE - discount_percent / HUNDRED)
}

/// Sale price from net cost and markup percentage.
///
/// The markup is margin-on-price: `(cost * 1.11) / (1 - pct/100)`, VAT
/// included. A markup of 100% or more would send the divisor to zero or
/// below, so it falls back to ten times cost. Pass `includes_vat = false`
/// to get the ex-VAT figure.
#[must_use]
pub fn calculate_price(cost: Decimal, markup_percent: Decimal, includes_vat: bool) -> Decimal {
    let margin = Decimal::ONE - markup_percent / HUNDRED;
    if margin <= Decimal::ZERO {
        return cost * Decimal::TEN;
    }
    let with_vat = cost * VAT_FACTOR / margin;
    if includes_vat {
        with_vat
    } else {
        with_vat / VAT_FACTOR
    }
}

/// Margin health of a proposed price against an item's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginStatus {
    /// The ex-VAT price is below cost.
    Loss,
    /// Margin is 5% or less.
    Low,
    /// Healthy margin.
    Ok,
}

/// Judge a proposed price against cost.
///
/// A zero cost or zero price is reported `Ok` - there is nothing to judge
/// until both figures exist.
#[must_use]
pub fn margin_status(cost: Decimal, new_price: Decimal, includes_vat: bool) -> MarginStatus {
    if cost == Decimal::ZERO || new_price == Decimal::ZERO {
        return MarginStatus::Ok;
    }
    let ex_vat = if includes_vat {
        new_price / VAT_FACTOR
    } else {
        new_price
    };
    if ex_vat < cost {
        return MarginStatus::Loss;
    }
    let margin_percent = (ex_vat - cost) / ex_vat * HUNDRED;
    if margin_percent <= Decimal::from(5) {
        MarginStatus::Low
    } else {
        MarginStatus::Ok
    }
}

/// Apply a price change to an item, recording it in the history log.
///
/// No-op (returns `false`) when the price did not change. Otherwise the
/// new price is set and a history entry is prepended, newest first.
pub fn apply_price_change(
    item: &mut Item,
    new_price: Decimal,
    rule_applied: String,
    includes_vat: bool,
    at: DateTime<Utc>,
) -> bool {
    if new_price == item.sale_price {
        return false;
    }
    item.pricing_history.insert(
        0,
        PricingHistoryEntry {
            date: at,
            new_price,
            rule_applied,
            includes_vat,
        },
    );
    item.sale_price = new_price;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemCode;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal")
    }

    fn classified_item() -> Item {
        let mut item = Item::new(ItemCode::new("A1").expect("valid code"));
        item.group = "Dairy".to_string();
        item.sub_group = "Cheese".to_string();
        item.brand = "Epiros".to_string();
        item.supplier = "Dairy Imports Ltd".to_string();
        item
    }

    fn rule(supplier: Option<&str>, category: Option<&str>, brand: Option<&str>) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            supplier: supplier.map(String::from),
            category: category.map(String::from),
            sub_category: None,
            brand: brand.map(String::from),
            percentage: dec("30"),
        }
    }

    #[test]
    fn test_net_cost_formula() {
        assert_eq!(net_cost(dec("4.00"), dec("25")), dec("3.00"));
        assert_eq!(net_cost(dec("10"), dec("0")), dec("10"));
        assert_eq!(net_cost(dec("10"), dec("100")), dec("0"));
        assert_eq!(net_cost(dec("7.35"), dec("12.5")), dec("6.430625"));
    }

    #[test]
    fn test_absent_and_empty_fields_are_wildcards() {
        let item = classified_item();
        assert!(rule(None, None, None).matches(&item));

        let mut empty_strings = rule(None, None, None);
        empty_strings.supplier = Some(String::new());
        empty_strings.category = Some(String::new());
        assert!(empty_strings.matches(&item));
    }

    #[test]
    fn test_present_fields_must_all_match() {
        let item = classified_item();
        assert!(rule(Some("Dairy Imports Ltd"), Some("Dairy"), None).matches(&item));
        assert!(!rule(Some("Dairy Imports Ltd"), Some("Frozen"), None).matches(&item));
        assert!(!rule(None, None, Some("Other Brand")).matches(&item));
    }

    #[test]
    fn test_first_match_is_declaration_order() {
        let item = classified_item();
        let narrow = rule(None, Some("Dairy"), None);
        let wide = rule(None, None, None);
        let rules = vec![narrow.clone(), wide];
        assert_eq!(first_match(&rules, &item).map(|r| r.id), Some(narrow.id));
    }

    #[test]
    fn test_calculate_price_includes_vat() {
        // (3.00 * 1.11) / (1 - 0.30) = 4.757142...
        let price = calculate_price(dec("3.00"), dec("30"), true);
        assert_eq!(price.round_dp(4), dec("4.7571"));
    }

    #[test]
    fn test_calculate_price_ex_vat_divides_factor_out() {
        let with_vat = calculate_price(dec("3.00"), dec("30"), true);
        let ex_vat = calculate_price(dec("3.00"), dec("30"), false);
        assert_eq!((with_vat / ex_vat).round_dp(2), dec("1.11"));
    }

    #[test]
    fn test_calculate_price_degenerate_margin_falls_back() {
        assert_eq!(calculate_price(dec("3.00"), dec("100"), true), dec("30.00"));
        assert_eq!(calculate_price(dec("3.00"), dec("120"), true), dec("30.00"));
    }

    #[test]
    fn test_margin_status_bands() {
        // 3.33 with VAT is 3.00 ex-VAT: exactly at cost, 0% margin.
        assert_eq!(margin_status(dec("3.00"), dec("3.33"), true), MarginStatus::Low);
        assert_eq!(margin_status(dec("3.00"), dec("2.90"), true), MarginStatus::Loss);
        assert_eq!(margin_status(dec("3.00"), dec("5.55"), true), MarginStatus::Ok);
        assert_eq!(margin_status(dec("3.00"), dec("2.99"), false), MarginStatus::Loss);
        assert_eq!(margin_status(Decimal::ZERO, dec("5"), true), MarginStatus::Ok);
        assert_eq!(margin_status(dec("3"), Decimal::ZERO, true), MarginStatus::Ok);
    }

    #[test]
    fn test_apply_price_change_prepends_history() {
        let mut item = classified_item();
        let first = Utc::now();
        assert!(apply_price_change(&mut item, dec("6.90"), "Manual: 30%".to_string(), true, first));
        let second = Utc::now();
        assert!(apply_price_change(
            &mut item,
            dec("7.20"),
            "rule-1".to_string(),
            true,
            second
        ));

        assert_eq!(item.sale_price, dec("7.20"));
        assert_eq!(item.pricing_history.len(), 2);
        assert_eq!(item.pricing_history[0].new_price, dec("7.20"));
        assert_eq!(item.pricing_history[0].rule_applied, "rule-1");
        assert_eq!(item.pricing_history[1].new_price, dec("6.90"));
    }

    #[test]
    fn test_apply_price_change_noop_when_unchanged() {
        let mut item = classified_item();
        item.sale_price = dec("6.90");
        assert!(!apply_price_change(
            &mut item,
            dec("6.90"),
            "Manual: 30%".to_string(),
            true,
            Utc::now()
        ));
        assert!(item.pricing_history.is_empty());
    }
}
