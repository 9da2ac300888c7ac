//! Threat Types
//!
//! Data structures only, classification lives in `classifier.rs`.

use serde::{Deserialize, Serialize};

/// Severity tiers, ordered LOW < MEDIUM < HIGH
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    /// Wire form used by the backend log (`"high"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Low => "low",
            SeverityTier::Medium => "medium",
            SeverityTier::High => "high",
        }
    }

    /// Label shown to people (`"HIGH"`)
    pub fn label(&self) -> &'static str {
        match self {
            SeverityTier::Low => "LOW",
            SeverityTier::Medium => "MEDIUM",
            SeverityTier::High => "HIGH",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SeverityTier::Low => "#28a745",    // Green
            SeverityTier::Medium => "#ffc107", // Yellow
            SeverityTier::High => "#dc3545",   // Red
        }
    }

    /// Subject prefix that makes urgent alerts stand out in an inbox
    pub fn subject_marker(&self) -> &'static str {
        match self {
            SeverityTier::High => "🚨 ",
            _ => "",
        }
    }

    pub fn requires_immediate_action(&self) -> bool {
        matches!(self, SeverityTier::High)
    }

    /// Parse the wire form, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(SeverityTier::Low),
            "medium" => Some(SeverityTier::Medium),
            "high" => Some(SeverityTier::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
