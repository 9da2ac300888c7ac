//! Dashboard State
//!
//! Last known good values of each polled endpoint. A failed fetch never
//! clears what is already shown.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{CurrentDetections, FetchError, LogEntry, StatsSummary};

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub stats: StatsSummary,
    pub detections: CurrentDetections,
    pub logs: Vec<LogEntry>,
    pub last_updated: Option<DateTime<Utc>>,
    pub fetch_failures: u64,
}

impl DashboardState {
    pub fn apply_stats(&mut self, result: Result<StatsSummary, FetchError>) -> bool {
        let applied = apply(&mut self.stats, result, "stats");
        self.record(applied)
    }

    pub fn apply_detections(&mut self, result: Result<CurrentDetections, FetchError>) -> bool {
        let applied = apply(&mut self.detections, result, "detections");
        self.record(applied)
    }

    pub fn apply_logs(&mut self, result: Result<Vec<LogEntry>, FetchError>) -> bool {
        let applied = apply(&mut self.logs, result, "logs");
        self.record(applied)
    }

    fn record(&mut self, applied: bool) -> bool {
        if applied {
            self.last_updated = Some(Utc::now());
        } else {
            self.fetch_failures += 1;
        }
        applied
    }
}

fn apply<T>(slot: &mut T, result: Result<T, FetchError>, what: &str) -> bool {
    match result {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(e) => {
            log::warn!("Error fetching {}: {}", what, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            timestamp: String::new(),
            object: "Gun".to_string(),
            confidence: 0.9,
            location: "CCTV-1".to_string(),
            status: "high".to_string(),
            email_sent: false,
        }
    }

    #[test]
    fn test_failure_keeps_previous_values() {
        let mut state = DashboardState::default();
        assert!(state.apply_logs(Ok(vec![entry("1"), entry("2")])));
        assert!(state.apply_stats(Ok(StatsSummary {
            total_detections: 2,
            ..Default::default()
        })));

        assert!(!state.apply_logs(Err(FetchError::Timeout)));
        assert!(!state.apply_stats(Err(FetchError::Server(502))));

        assert_eq!(state.logs.len(), 2);
        assert_eq!(state.stats.total_detections, 2);
        assert_eq!(state.fetch_failures, 2);
        assert!(state.last_updated.is_some());
    }

    #[test]
    fn test_success_replaces_snapshot() {
        let mut state = DashboardState::default();
        state.apply_logs(Ok(vec![entry("1")]));
        state.apply_logs(Ok(vec![entry("2"), entry("3")]));
        let ids: Vec<_> = state.logs.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);
    }
}
