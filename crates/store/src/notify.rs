//! Notification records and the reminder sweep.
//!
//! The schedule that triggers the sweep is an external collaborator, and
//! it may fire more often than the underlying stock changes. The sweep is
//! therefore idempotent over short intervals: a reminder identical to one
//! already raised inside the cooldown window is suppressed. Actual email
//! delivery is likewise external - the sweep only records the
//! notification for it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shelfline_core::{ReminderLine, expiring_within};
use thiserror::Error;
use uuid::Uuid;

use crate::document::Document;

/// Kind discriminator for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Expiry reminder raised by the sweep.
    Reminder,
}

/// One entry in the notification log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification identity.
    pub id: Uuid,
    /// When it was raised.
    pub date: DateTime<Utc>,
    /// What raised it.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Human-readable summary.
    pub content: String,
    /// Whether an operator has acknowledged it.
    pub read: bool,
}

/// Errors from notification log operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// No notification with the given id exists.
    #[error("notification not found")]
    NotFound,
}

/// Build a reminder notification for the given lines.
///
/// Returns `None` when there is nothing to remind about or nobody to
/// remind - no notification is logged in either case.
#[must_use]
pub fn build_reminder(
    recipients: &[String],
    lines: &[ReminderLine],
    now: DateTime<Utc>,
) -> Option<Notification> {
    if recipients.is_empty() || lines.is_empty() {
        return None;
    }
    Some(Notification {
        id: Uuid::new_v4(),
        date: now,
        kind: NotificationKind::Reminder,
        content: format!("Sent reminder for {} expiring item(s).", lines.len()),
        read: false,
    })
}

/// Run the reminder sweep against the document.
///
/// Collects lots inside the reminder window, builds a notification, and
/// prepends it to the log - unless an identical reminder was already
/// raised within the cooldown window, in which case the duplicate is
/// suppressed. Returns the id of the notification raised, if any.
pub fn sweep_reminders(doc: &mut Document, now: DateTime<Utc>) -> Option<Uuid> {
    let lines = expiring_within(&doc.items, now.date_naive(), doc.settings.reminder_days);
    let candidate = build_reminder(&doc.settings.recipient_emails, &lines, now)?;

    let cooldown = Duration::minutes(doc.settings.notification_cooldown_minutes);
    let duplicate = doc.notifications.iter().any(|existing| {
        existing.kind == NotificationKind::Reminder
            && existing.content == candidate.content
            && now - existing.date < cooldown
    });
    if duplicate {
        tracing::debug!(lines = lines.len(), "reminder suppressed inside cooldown window");
        return None;
    }

    tracing::info!(lines = lines.len(), id = %candidate.id, "reminder raised");
    let id = candidate.id;
    doc.notifications.insert(0, candidate);
    Some(id)
}

/// Mark a notification as read.
///
/// # Errors
///
/// Returns [`NotificationError::NotFound`] if no notification has `id`.
pub fn mark_read(notifications: &mut [Notification], id: Uuid) -> Result<(), NotificationError> {
    let notification = notifications
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or(NotificationError::NotFound)?;
    notification.read = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shelfline_core::{Item, ItemCode, Lot};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn doc_with_expiring_item() -> Document {
        let mut item = Item::new(ItemCode::new("A1").expect("valid code"));
        item.description = "Graviera 250g".to_string();
        item.lots.push(Lot::new(
            now().date_naive() + Duration::days(10),
            3,
            now(),
        ));
        let mut doc = Document::default();
        doc.items.push(item);
        doc.settings.recipient_emails = vec!["ops@example.com".to_string()];
        doc
    }

    #[test]
    fn test_sweep_raises_reminder() {
        let mut doc = doc_with_expiring_item();
        let id = sweep_reminders(&mut doc, now()).expect("reminder raised");
        assert_eq!(doc.notifications.len(), 1);
        assert_eq!(doc.notifications[0].id, id);
        assert_eq!(doc.notifications[0].kind, NotificationKind::Reminder);
        assert_eq!(
            doc.notifications[0].content,
            "Sent reminder for 1 expiring item(s)."
        );
        assert!(!doc.notifications[0].read);
    }

    #[test]
    fn test_no_recipients_means_no_notification() {
        let mut doc = doc_with_expiring_item();
        doc.settings.recipient_emails.clear();
        assert!(sweep_reminders(&mut doc, now()).is_none());
        assert!(doc.notifications.is_empty());
    }

    #[test]
    fn test_nothing_expiring_means_no_notification() {
        let mut doc = doc_with_expiring_item();
        doc.items[0].lots.clear();
        assert!(sweep_reminders(&mut doc, now()).is_none());
        assert!(doc.notifications.is_empty());
    }

    #[test]
    fn test_duplicate_inside_cooldown_is_suppressed() {
        let mut doc = doc_with_expiring_item();
        assert!(sweep_reminders(&mut doc, now()).is_some());
        // Fired again five minutes later with identical content.
        assert!(sweep_reminders(&mut doc, now() + Duration::minutes(5)).is_none());
        assert_eq!(doc.notifications.len(), 1);
    }

    #[test]
    fn test_reminder_fires_again_after_cooldown() {
        let mut doc = doc_with_expiring_item();
        assert!(sweep_reminders(&mut doc, now()).is_some());
        assert!(sweep_reminders(&mut doc, now() + Duration::minutes(16)).is_some());
        assert_eq!(doc.notifications.len(), 2);
        // Newest first.
        assert!(doc.notifications[0].date > doc.notifications[1].date);
    }

    #[test]
    fn test_changed_content_is_not_suppressed() {
        let mut doc = doc_with_expiring_item();
        assert!(sweep_reminders(&mut doc, now()).is_some());

        // A second lot enters the window, so the summary changes.
        doc.items[0].lots.push(Lot::new(
            now().date_naive() + Duration::days(12),
            1,
            now(),
        ));
        assert!(sweep_reminders(&mut doc, now() + Duration::minutes(5)).is_some());
        assert_eq!(doc.notifications.len(), 2);
    }

    #[test]
    fn test_mark_read() {
        let mut doc = doc_with_expiring_item();
        let id = sweep_reminders(&mut doc, now()).expect("reminder raised");
        mark_read(&mut doc.notifications, id).expect("found");
        assert!(doc.notifications[0].read);

        assert_eq!(
            mark_read(&mut doc.notifications, Uuid::new_v4()),
            Err(NotificationError::NotFound)
        );
    }

    #[test]
    fn test_notification_serializes_type_field() {
        let n = build_reminder(
            &["ops@example.com".to_string()],
            &[ReminderLine {
                code: ItemCode::new("A1").expect("valid code"),
                description: String::new(),
                date: now().date_naive(),
                quantity: 1,
            }],
            now(),
        )
        .expect("notification");
        let value = serde_json::to_value(&n).expect("serializable");
        assert_eq!(value.get("type").expect("type field"), "reminder");
    }
}
