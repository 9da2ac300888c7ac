//! Alert Module
//!
//! - `types`: `DetectionEvent`, `AlertPayload`, `InvalidEventError`
//! - `composer`: event -> subject + HTML body + plain body
//! - `gate`: confidence threshold and per-class cooldown

pub mod types;
pub mod composer;
pub mod gate;

pub use types::{parse_timestamp, AlertPayload, DetectionEvent, InvalidEventError};
pub use composer::{compose, confidence_percent, AlertComposer};
pub use gate::{AlertGate, GateDecision};
