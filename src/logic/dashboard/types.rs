//! Dashboard API types
//!
//! Wire shapes of the detection backend's read and control endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_LOCATION;
use crate::logic::alert::parse_timestamp;
use crate::logic::threat::{classify, SeverityTier};

// ============================================================================
// LOGS (/api/logs)
// ============================================================================

/// One persisted detection, as returned by `/api/logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Assigned once by the backend, never reused
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default = "default_location")]
    pub location: String,
    /// `low` | `medium` | `high`
    #[serde(default)]
    pub status: String,
    /// Outcome of the alert dispatch for this entry
    #[serde(default, alias = "emailSent")]
    pub email_sent: bool,
}

impl LogEntry {
    pub fn severity(&self) -> Option<SeverityTier> {
        SeverityTier::parse(&self.status)
    }

    /// The backend derives `status` from the same thresholds as the classifier
    pub fn status_matches_confidence(&self) -> bool {
        self.severity() == Some(classify(self.confidence))
    }

    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub total: usize,
}

// ============================================================================
// STATS (/api/stats)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSummary {
    pub total_detections: u64,
    pub active_cameras: u32,
    pub uptime_hours: f64,
    /// `Low` | `Medium` | `High`
    pub threat_level: String,
    pub current_detections: u32,
}

impl Default for StatsSummary {
    fn default() -> Self {
        Self {
            total_detections: 0,
            active_cameras: 0,
            uptime_hours: 0.0,
            threat_level: "Low".to_string(),
            current_detections: 0,
        }
    }
}

// ============================================================================
// CURRENT DETECTIONS (/api/detections)
// ============================================================================

/// One object in the current frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub object_class: String,
    pub confidence: f64,
    /// `[xmin, ymin, xmax, ymax]`
    #[serde(default)]
    pub bbox: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentDetections {
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub count: usize,
}

// ============================================================================
// STREAM CONTROL (/api/start_stream, /api/stop_stream)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamControlResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl StreamControlResponse {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Transient failure reading the backend. Callers keep their last good state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {0}")]
    Server(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
