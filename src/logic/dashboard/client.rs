//! Dashboard API Client
//!
//! HTTP client for the detection backend's REST endpoints.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::types::{CurrentDetections, FetchError, LogEntry, LogsResponse, StatsSummary, StreamControlResponse};
use crate::config::DashboardConfig;

/// Read and control surface of the detection backend
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_stats(&self) -> Result<StatsSummary, FetchError>;
    async fn fetch_detections(&self) -> Result<CurrentDetections, FetchError>;
    async fn fetch_logs(&self) -> Result<Vec<LogEntry>, FetchError>;
    async fn start_stream(&self) -> Result<StreamControlResponse, FetchError>;
    async fn stop_stream(&self) -> Result<StreamControlResponse, FetchError>;
}

pub struct DashboardClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl DashboardClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http_client.get(&url).send().await.map_err(map_reqwest)?;
        Self::read_json(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(map_reqwest)?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
        if !response.status().is_success() {
            return Err(FetchError::Server(response.status().as_u16()));
        }
        response.json().await.map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn fetch_stats(&self) -> Result<StatsSummary, FetchError> {
        self.get_json("/api/stats").await
    }

    async fn fetch_detections(&self) -> Result<CurrentDetections, FetchError> {
        self.get_json("/api/detections").await
    }

    async fn fetch_logs(&self) -> Result<Vec<LogEntry>, FetchError> {
        let response: LogsResponse = self.get_json("/api/logs").await?;
        Ok(response.logs)
    }

    async fn start_stream(&self) -> Result<StreamControlResponse, FetchError> {
        self.post_json("/api/start_stream").await
    }

    async fn stop_stream(&self) -> Result<StreamControlResponse, FetchError> {
        self.post_json("/api/stop_stream").await
    }
}

fn map_reqwest(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(url: &str) -> DashboardConfig {
        DashboardConfig {
            api_url: url.to_string(),
            fetch_timeout: Duration::from_millis(500),
            logs_interval: Duration::from_secs(2),
            stats_interval: Duration::from_secs(2),
            detections_interval: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_base_url_normalized() {
        let client = DashboardClient::new(&config("http://localhost:8000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_fetch_error() {
        // Port 9 (discard) on loopback is not served in test environments
        let client = DashboardClient::new(&config("http://127.0.0.1:9")).unwrap();
        let err = client.fetch_logs().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_) | FetchError::Timeout));
    }
}
