//! Alert Gate
//!
//! Decides whether a detection is worth an email: confidence must reach the
//! threshold, and each object class is limited to one delivered alert per
//! cooldown window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::constants::{DEFAULT_ALERT_COOLDOWN_SECS, DEFAULT_ALERT_THRESHOLD};

/// Outcome of a gate check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    Allow,
    BelowThreshold,
    CoolingDown { remaining: Duration },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

pub struct AlertGate {
    threshold: f64,
    cooldown: Duration,
    /// Last delivered alert per object class
    last_alert: Mutex<HashMap<String, Instant>>,
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_THRESHOLD, Duration::from_secs(DEFAULT_ALERT_COOLDOWN_SECS))
    }
}

impl AlertGate {
    pub fn new(threshold: f64, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            last_alert: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, object_class: &str, confidence: f64) -> GateDecision {
        self.check_at(object_class, confidence, Instant::now())
    }

    pub fn check_at(&self, object_class: &str, confidence: f64, now: Instant) -> GateDecision {
        if confidence < self.threshold {
            return GateDecision::BelowThreshold;
        }

        if let Some(last) = self.last_alert.lock().get(object_class) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < self.cooldown {
                return GateDecision::CoolingDown {
                    remaining: self.cooldown - elapsed,
                };
            }
        }

        GateDecision::Allow
    }

    /// Start the cooldown for `object_class`. Call only after a successful delivery.
    pub fn record_delivery(&self, object_class: &str) {
        self.record_delivery_at(object_class, Instant::now());
    }

    pub fn record_delivery_at(&self, object_class: &str, now: Instant) {
        self.last_alert.lock().insert(object_class.to_string(), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        let gate = AlertGate::default();
        assert_eq!(gate.check("Gun", 0.49), GateDecision::BelowThreshold);
        assert_eq!(gate.check("Gun", 0.5), GateDecision::Allow);
    }

    #[test]
    fn test_cooldown_per_class() {
        let gate = AlertGate::new(0.5, Duration::from_secs(60));
        let t0 = Instant::now();
        gate.record_delivery_at("Gun", t0);

        let later = t0 + Duration::from_secs(10);
        assert_eq!(
            gate.check_at("Gun", 0.9, later),
            GateDecision::CoolingDown { remaining: Duration::from_secs(50) }
        );
        // Other classes are unaffected
        assert!(gate.check_at("Knife", 0.9, later).is_allowed());
        // Window elapsed
        assert!(gate.check_at("Gun", 0.9, t0 + Duration::from_secs(60)).is_allowed());
    }

    #[test]
    fn test_no_cooldown_without_delivery() {
        let gate = AlertGate::default();
        assert!(gate.check("Gun", 0.9).is_allowed());
        // A check on its own does not start the window
        assert!(gate.check("Gun", 0.9).is_allowed());
    }
}
