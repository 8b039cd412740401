//! Reminder sweep and notification management.

use shelfline_store::{JsonStore, notify};
use uuid::Uuid;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Run the reminder sweep once against the document.
///
/// The scheduling itself (cron, systemd timer) is up to the operator; the
/// sweep's cooldown keeps an over-eager schedule from flooding the log.
pub fn sweep(store: &JsonStore) -> CommandResult {
    let mut doc = store.load()?;
    match notify::sweep_reminders(&mut doc, chrono::Utc::now()) {
        Some(id) => {
            store.save(&doc)?;
            tracing::info!(%id, "reminder notification raised");
        }
        None => tracing::info!("nothing to remind"),
    }
    Ok(())
}

/// Mark a notification as read.
pub fn mark_read(store: &JsonStore, id: Uuid) -> CommandResult {
    let mut doc = store.load()?;
    notify::mark_read(&mut doc.notifications, id)?;
    store.save(&doc)?;
    tracing::info!(%id, "notification marked as read");
    Ok(())
}
