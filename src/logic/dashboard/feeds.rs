//! Stats and detections polling into shared dashboard state

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::client::DashboardApi;
use super::poller::PollTask;
use super::state::DashboardState;
use super::types::{CurrentDetections, FetchError, StatsSummary};

pub fn start_stats_poll(api: Arc<dyn DashboardApi>, interval: Duration, state: Arc<RwLock<DashboardState>>) -> PollTask {
    PollTask::start(
        "stats",
        interval,
        move || {
            let api = api.clone();
            async move { api.fetch_stats().await }
        },
        move |result: Result<StatsSummary, FetchError>| {
            let mut state = state.write();
            if state.apply_stats(result) {
                log::debug!(
                    "Stats: {} detections, threat level {}",
                    state.stats.total_detections,
                    state.stats.threat_level
                );
            }
        },
    )
}

pub fn start_detections_poll(
    api: Arc<dyn DashboardApi>,
    interval: Duration,
    state: Arc<RwLock<DashboardState>>,
) -> PollTask {
    PollTask::start(
        "detections",
        interval,
        move || {
            let api = api.clone();
            async move { api.fetch_detections().await }
        },
        move |result: Result<CurrentDetections, FetchError>| {
            state.write().apply_detections(result);
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use crate::logic::dashboard::{LogEntry, StreamControlResponse};

    /// Stats once, then unreachable
    #[derive(Default)]
    struct FlakyBackend {
        stats_served: Mutex<bool>,
    }

    #[async_trait]
    impl DashboardApi for FlakyBackend {
        async fn fetch_stats(&self) -> Result<StatsSummary, FetchError> {
            let mut served = self.stats_served.lock();
            if *served {
                return Err(FetchError::Network("connection refused".to_string()));
            }
            *served = true;
            Ok(StatsSummary {
                total_detections: 12,
                threat_level: "High".to_string(),
                ..Default::default()
            })
        }

        async fn fetch_detections(&self) -> Result<CurrentDetections, FetchError> {
            Err(FetchError::Server(500))
        }

        async fn fetch_logs(&self) -> Result<Vec<LogEntry>, FetchError> {
            Err(FetchError::Timeout)
        }

        async fn start_stream(&self) -> Result<StreamControlResponse, FetchError> {
            Err(FetchError::Timeout)
        }

        async fn stop_stream(&self) -> Result<StreamControlResponse, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_failed_polls_keep_last_stats() {
        let api: Arc<dyn DashboardApi> = Arc::new(FlakyBackend::default());
        let state = Arc::new(RwLock::new(DashboardState::default()));

        let stats = start_stats_poll(api.clone(), Duration::from_millis(10), state.clone());
        let detections = start_detections_poll(api, Duration::from_millis(10), state.clone());
        tokio::time::sleep(Duration::from_millis(80)).await;
        stats.shutdown().await;
        detections.shutdown().await;

        let state = state.read();
        assert_eq!(state.stats.total_detections, 12);
        assert_eq!(state.stats.threat_level, "High");
        assert!(state.detections.detections.is_empty());
        assert!(state.fetch_failures >= 2);
    }
}
