//! Notify Module - Delivery Notifications
//!
//! Turns repeated log snapshots into exactly one notification per log
//! entry whose alert was delivered.
//!
//! ## Structure
//! - `seen`: per-session set of surfaced ids
//! - `reconcile`: snapshot vs. seen set
//! - `notifier`: `Notification`, `Notifier` trait, `LogNotifier`
//! - `watcher`: `LogWatcher`, one session
//! - `feed`: `/api/logs` poll task driving a watcher

pub mod seen;
pub mod reconcile;
pub mod notifier;
pub mod watcher;
pub mod feed;


pub use seen::SeenNotificationSet;
pub use reconcile::reconcile;
pub use notifier::{LogNotifier, Notification, Notifier, NOTIFICATION_TITLE};
pub use watcher::LogWatcher;
pub use feed::start_log_poll;
