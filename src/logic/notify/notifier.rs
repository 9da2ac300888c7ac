//! Notifications
//!
//! User-facing "email sent" notices and the sinks that display them.

use serde::Serialize;

use crate::logic::dashboard::LogEntry;
use crate::logic::threat::{classify, SeverityTier};

pub const NOTIFICATION_TITLE: &str = "Email Sent";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub log_id: String,
    pub title: String,
    pub description: String,
    pub severity: SeverityTier,
}

impl Notification {
    pub fn from_entry(entry: &LogEntry) -> Self {
        let pct = (entry.confidence * 100.0).round();
        Self {
            log_id: entry.id.clone(),
            title: NOTIFICATION_TITLE.to_string(),
            description: format!(
                "{} detected at {} ({}%) - Notification dispatched",
                entry.object, entry.location, pct
            ),
            severity: entry.severity().unwrap_or_else(|| classify(entry.confidence)),
        }
    }
}

/// Surface for notifications (toast, log line, ...)
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications through the `log` facade
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.severity {
            SeverityTier::High => log::warn!("📧 {}: {}", notification.title, notification.description),
            _ => log::info!("📧 {}: {}", notification.title, notification.description),
        }
    }
}
