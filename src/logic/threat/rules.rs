//! Severity Tier Boundaries
//!
//! Constants only. Each tier includes its lower bound.

/// At or above this confidence = HIGH
pub const HIGH_THRESHOLD: f64 = 0.8;

/// At or above this confidence (and below HIGH) = MEDIUM
pub const MEDIUM_THRESHOLD: f64 = 0.6;
