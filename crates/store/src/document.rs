//! The persisted document and its settings.
//!
//! One JSON document holds the whole system state. Field names (and the
//! nullable `backup` slot) match what earlier versions of the system wrote,
//! and every newer field carries a serde default so older documents load
//! without migration.

use serde::{Deserialize, Serialize};
use shelfline_core::{Item, PricingRule, SnapshotSlot};

use crate::notify::Notification;

const DEFAULT_REMINDER_DAYS: i64 = 30;
const DEFAULT_COOLDOWN_MINUTES: i64 = 15;

/// Operator-tunable settings stored inside the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// How many days ahead the reminder sweep looks.
    #[serde(default = "default_reminder_days")]
    pub reminder_days: i64,
    /// Addresses the delivery collaborator should notify.
    #[serde(default)]
    pub recipient_emails: Vec<String>,
    /// Minimum minutes between identical reminder notifications.
    #[serde(default = "default_cooldown_minutes")]
    pub notification_cooldown_minutes: i64,
}

const fn default_reminder_days() -> i64 {
    DEFAULT_REMINDER_DAYS
}

const fn default_cooldown_minutes() -> i64 {
    DEFAULT_COOLDOWN_MINUTES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminder_days: DEFAULT_REMINDER_DAYS,
            recipient_emails: Vec::new(),
            notification_cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
        }
    }
}

/// The full persisted state: catalog, settings, notification log, pricing
/// rules, and the single pre-reconciliation backup slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The item catalog.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Operator settings.
    #[serde(default)]
    pub settings: Settings,
    /// Notification log, newest first.
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Pricing rules in declaration order.
    #[serde(default, rename = "pricingRules")]
    pub pricing_rules: Vec<PricingRule>,
    /// Snapshot of the catalog taken before the last reconcile batch.
    #[serde(default)]
    pub backup: SnapshotSlot,
}
