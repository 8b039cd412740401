//! Expiry-band bucketing for the dashboard and reports.
//!
//! Every lot of every item lands in exactly one band, judged on whole days
//! between the reference date and the lot's expiry date. Band keys
//! serialize to the labels the dashboard has always used (`expired`,
//! `<1mo`, `1-2mo`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::item::{Item, ItemCode};

/// Fixed time-to-expiry bands, in evaluation (and display) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpiryBand {
    /// Already past its date (`days_until < 0`).
    #[serde(rename = "expired")]
    Expired,
    /// Expires within a month (`0..=30` days).
    #[serde(rename = "<1mo")]
    UnderOneMonth,
    /// `31..=60` days out.
    #[serde(rename = "1-2mo")]
    OneToTwoMonths,
    /// `61..=150` days out.
    #[serde(rename = "2-5mo")]
    TwoToFiveMonths,
    /// `151..=365` days out.
    #[serde(rename = "5mo-1y")]
    FiveMonthsToYear,
    /// More than a year out.
    #[serde(rename = ">1y")]
    OverOneYear,
}

impl ExpiryBand {
    /// All bands in display order.
    pub const ALL: [Self; 6] = [
        Self::Expired,
        Self::UnderOneMonth,
        Self::OneToTwoMonths,
        Self::TwoToFiveMonths,
        Self::FiveMonthsToYear,
        Self::OverOneYear,
    ];

    /// Classify a whole-day distance to expiry.
    #[must_use]
    pub const fn of_days(days_until: i64) -> Self {
        if days_until < 0 {
            Self::Expired
        } else if days_until <= 30 {
            Self::UnderOneMonth
        } else if days_until <= 60 {
            Self::OneToTwoMonths
        } else if days_until <= 150 {
            Self::TwoToFiveMonths
        } else if days_until <= 365 {
            Self::FiveMonthsToYear
        } else {
            Self::OverOneYear
        }
    }

    /// Human-readable label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired Items",
            Self::UnderOneMonth => "Less than 1 Month",
            Self::OneToTwoMonths => "1-2 Months",
            Self::TwoToFiveMonths => "2-5 Months",
            Self::FiveMonthsToYear => "5 Months - 1 Year",
            Self::OverOneYear => "More than 1 Year",
        }
    }
}

/// One lot flattened with its parent item's display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorizedLot {
    /// Parent item code.
    pub code: ItemCode,
    /// Parent item description.
    pub description: String,
    /// Parent item group.
    pub group: String,
    /// Lot expiry date.
    pub date: NaiveDate,
    /// Lot quantity.
    pub quantity: i64,
    /// Whole days from the reference date to expiry (negative if past).
    pub days_until: i64,
}

/// Bucket every lot of every item into its expiry band.
///
/// All bands are present in the result, empty or not. Entries within a
/// band are sorted ascending by days-until-expiry.
#[must_use]
pub fn categorize(items: &[Item], as_of: NaiveDate) -> BTreeMap<ExpiryBand, Vec<CategorizedLot>> {
    let mut bands: BTreeMap<ExpiryBand, Vec<CategorizedLot>> =
        ExpiryBand::ALL.iter().map(|band| (*band, Vec::new())).collect();

    for item in items {
        for lot in &item.lots {
            let days_until = (lot.date - as_of).num_days();
            let entry = CategorizedLot {
                code: item.code.clone(),
                description: item.description.clone(),
                group: item.group.clone(),
                date: lot.date,
                quantity: lot.quantity,
                days_until,
            };
            bands
                .entry(ExpiryBand::of_days(days_until))
                .or_default()
                .push(entry);
        }
    }

    for entries in bands.values_mut() {
        entries.sort_by_key(|entry| entry.days_until);
    }

    bands
}
