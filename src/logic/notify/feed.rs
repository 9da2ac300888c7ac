//! Log feed
//!
//! Polls `/api/logs`, feeds every good snapshot to the watcher and keeps the
//! dashboard state current. A failed fetch raises nothing and leaves the
//! previous snapshot in place.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use super::watcher::LogWatcher;
use crate::logic::dashboard::{DashboardApi, DashboardState, FetchError, LogEntry, PollTask};

pub fn start_log_poll(
    api: Arc<dyn DashboardApi>,
    interval: Duration,
    watcher: Arc<Mutex<LogWatcher>>,
    state: Arc<RwLock<DashboardState>>,
) -> PollTask {
    PollTask::start(
        "logs",
        interval,
        move || {
            let api = api.clone();
            async move { api.fetch_logs().await }
        },
        move |result: Result<Vec<LogEntry>, FetchError>| {
            if let Ok(logs) = &result {
                let raised = watcher.lock().observe(logs);
                if raised > 0 {
                    log::debug!("{} new delivery notification(s)", raised);
                }
            }
            state.write().apply_logs(result);
        },
    )
}
