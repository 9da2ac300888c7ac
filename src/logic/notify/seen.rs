//! Seen Notification Set
//!
//! Ids already surfaced in the current session. Starts empty and only grows.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct SeenNotificationSet {
    ids: HashSet<String>,
}

impl SeenNotificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true` if the id was not seen before
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
