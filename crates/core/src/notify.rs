//! Selection of lots inside the reminder window.
//!
//! The periodic sweep (in the store crate) asks this module which lots are
//! close enough to expiry to warrant a reminder. Only strictly future
//! dates qualify - already expired stock is the dashboard's business, not
//! the reminder's.

use chrono::NaiveDate;
use serde::Serialize;

use crate::item::{Item, ItemCode};

/// One line of a reminder: a lot nearing expiry with its item context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderLine {
    /// Parent item code.
    pub code: ItemCode,
    /// Parent item description.
    pub description: String,
    /// Lot expiry date.
    pub date: NaiveDate,
    /// Lot quantity.
    pub quantity: i64,
}

/// Collect every lot expiring within `reminder_days` of `as_of`.
///
/// The window is `0 < days_until <= reminder_days`: stock expiring today
/// or already expired is excluded, the far boundary is inclusive.
#[must_use]
pub fn expiring_within(items: &[Item], as_of: NaiveDate, reminder_days: i64) -> Vec<ReminderLine> {
    let mut lines = Vec::new();
    for item in items {
        for lot in &item.lots {
            let days_until = (lot.date - as_of).num_days();
            if days_until > 0 && days_until <= reminder_days {
                lines.push(ReminderLine {
                    code: item.code.clone(),
                    description: item.description.clone(),
                    date: lot.date,
                    quantity: lot.quantity,
                });
            }
        }
    }
    lines
}
