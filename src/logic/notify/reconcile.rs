//! Log reconciliation
//!
//! Picks the entries of a log snapshot that carry a delivered alert and have
//! not been surfaced yet.

use super::seen::SeenNotificationSet;
use crate::logic::dashboard::LogEntry;

/// Return the newly delivered entries of `batch`, in batch order, and mark
/// them as seen. Feeding the same batch again returns nothing.
pub fn reconcile(batch: &[LogEntry], seen: &mut SeenNotificationSet) -> Vec<LogEntry> {
    let mut fresh = Vec::new();

    for entry in batch {
        if !entry.email_sent || !seen.insert(&entry.id) {
            continue;
        }
        if !entry.status_matches_confidence() {
            log::warn!(
                "Log entry {} status '{}' does not match confidence {:.2}",
                entry.id,
                entry.status,
                entry.confidence
            );
        }
        fresh.push(entry.clone());
    }

    fresh
}
