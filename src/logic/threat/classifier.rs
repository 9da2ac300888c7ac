//! Threat Classifier
//!
//! Input: detector confidence. Output: `SeverityTier`.
//! Total and pure, there is no error path.

use super::rules::{HIGH_THRESHOLD, MEDIUM_THRESHOLD};
use super::types::SeverityTier;

/// Classify a confidence score.
///
/// NaN and negative values fall through to LOW.
pub fn classify(confidence: f64) -> SeverityTier {
    if confidence >= HIGH_THRESHOLD {
        SeverityTier::High
    } else if confidence >= MEDIUM_THRESHOLD {
        SeverityTier::Medium
    } else {
        SeverityTier::Low
    }
}

impl SeverityTier {
    pub fn classify(confidence: f64) -> Self {
        classify(confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_edges() {
        assert_eq!(classify(0.0), SeverityTier::Low);
        assert_eq!(classify(0.59999), SeverityTier::Low);
        assert_eq!(classify(0.6), SeverityTier::Medium);
        assert_eq!(classify(0.79999), SeverityTier::Medium);
        assert_eq!(classify(0.8), SeverityTier::High);
        assert_eq!(classify(1.0), SeverityTier::High);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = classify(0.0);
        for step in 0..=10_000 {
            let tier = classify(step as f64 / 10_000.0);
            assert!(tier >= previous, "tier dropped at step {}", step);
            previous = tier;
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(classify(f64::NAN), SeverityTier::Low);
        assert_eq!(classify(-1.0), SeverityTier::Low);
        assert_eq!(classify(7.0), SeverityTier::High);
    }

    #[test]
    fn test_wire_forms() {
        assert_eq!(SeverityTier::High.as_str(), "high");
        assert_eq!(SeverityTier::Medium.to_string(), "MEDIUM");
        assert_eq!(SeverityTier::parse("LOW"), Some(SeverityTier::Low));
        assert_eq!(SeverityTier::parse("critical"), None);
        assert_eq!(serde_json::to_string(&SeverityTier::High).unwrap(), "\"high\"");
    }
}
