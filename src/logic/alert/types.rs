//! Alert Types
//!
//! Detection events as emitted by the detector, and the composed alert
//! that is handed to the dispatcher.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_LOCATION;
use crate::logic::threat::SeverityTier;

// ============================================================================
// DETECTION EVENT
// ============================================================================

/// One observation from the external detector
///
/// Wire shape: `{"class": "Gun", "confidence": 0.95, "timestamp": "...", "location": "CCTV-1"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// Detected object type (weapon category)
    #[serde(rename = "class", default, deserialize_with = "null_as_empty")]
    pub object_class: String,

    /// Detector confidence (0.0 - 1.0). Required, kept optional so that
    /// absence is reported as a validation error instead of a parse error.
    #[serde(default)]
    pub confidence: Option<f64>,

    /// When the event occurred. Defaults to the time of parsing.
    #[serde(default = "Utc::now", deserialize_with = "flexible_timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Originating camera/feed
    #[serde(default = "default_location", deserialize_with = "null_as_default_location")]
    pub location: String,
}

impl DetectionEvent {
    pub fn new(object_class: &str, confidence: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            object_class: object_class.to_string(),
            confidence: Some(confidence),
            timestamp,
            location: default_location(),
        }
    }

    pub fn at_location(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    /// Parse and validate a JSON-encoded event
    pub fn from_json(raw: &str) -> Result<Self, InvalidEventError> {
        let event: Self =
            serde_json::from_str(raw).map_err(|e| InvalidEventError::Malformed(e.to_string()))?;
        event.validate()?;
        Ok(event)
    }

    /// Check the event invariants, returning the confidence on success
    pub fn validate(&self) -> Result<f64, InvalidEventError> {
        if self.object_class.trim().is_empty() {
            return Err(InvalidEventError::MissingClass);
        }
        let confidence = self.confidence.ok_or(InvalidEventError::MissingConfidence)?;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(InvalidEventError::ConfidenceOutOfRange(confidence));
        }
        Ok(confidence)
    }
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_location<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_location))
}

fn flexible_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {}", raw)))
}

/// Parse RFC 3339, or a naive ISO 8601 date-time taken as UTC
/// (the backend logs `datetime.now().isoformat()` without an offset).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// ============================================================================
// ALERT PAYLOAD
// ============================================================================

/// Ready-to-send alert for one detection event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPayload {
    pub subject: String,
    /// Rich (HTML) representation
    pub html_body: String,
    /// Plain-text representation, carries the same facts
    pub text_body: String,
    pub severity: SeverityTier,
    pub object_class: String,
    /// Confidence percentage with two decimals, e.g. `"95.00"`
    pub confidence_percent: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Malformed or incomplete detection event. Never reaches the transport.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidEventError {
    #[error("Invalid detection data: missing required field 'class'")]
    MissingClass,

    #[error("Invalid detection data: missing required field 'confidence'")]
    MissingConfidence,

    #[error("Invalid detection data: confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("Error parsing detection data: {0}")]
    Malformed(String),
}
