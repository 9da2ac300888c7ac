//! Dashboard Module - Detection Backend Polling
//!
//! ## Structure
//! - `types`: wire shapes of `/api/stats`, `/api/detections`, `/api/logs`
//! - `client`: `DashboardApi` trait and the reqwest-backed client
//! - `state`: last known good values per endpoint
//! - `poller`: fixed-interval task with start/cancel
//! - `feeds`: stats and detections poll tasks

pub mod types;
pub mod client;
pub mod state;
pub mod poller;
pub mod feeds;

pub use types::{
    CurrentDetections, Detection, FetchError, LogEntry, LogsResponse, StatsSummary, StreamControlResponse,
};
pub use client::{DashboardApi, DashboardClient};
pub use state::DashboardState;
pub use poller::PollTask;
pub use feeds::{start_detections_poll, start_stats_poll};
