//! Log Watcher
//!
//! Owns the seen set of one polling session and raises a notification per
//! newly delivered log entry.

use std::sync::Arc;

use uuid::Uuid;

use super::notifier::{Notification, Notifier};
use super::reconcile::reconcile;
use super::seen::SeenNotificationSet;
use crate::logic::dashboard::LogEntry;

pub struct LogWatcher {
    session_id: Uuid,
    seen: SeenNotificationSet,
    notifier: Arc<dyn Notifier>,
}

impl LogWatcher {
    /// Fresh session with an empty seen set
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        let session_id = Uuid::new_v4();
        log::debug!("Log watcher session {} started", session_id);
        Self {
            session_id,
            seen: SeenNotificationSet::new(),
            notifier,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn seen(&self) -> &SeenNotificationSet {
        &self.seen
    }

    /// Reconcile one log snapshot. Returns the number of notifications raised.
    pub fn observe(&mut self, batch: &[LogEntry]) -> usize {
        let fresh = reconcile(batch, &mut self.seen);
        for entry in &fresh {
            self.notifier.notify(&Notification::from_entry(entry));
        }
        fresh.len()
    }
}
