//! Threat Notification Pipeline
//!
//! Classifies weapon detections, emails alerts for them and surfaces one
//! notification per delivered alert from the dashboard's log feed.

pub mod config;
pub mod constants;
pub mod logic;
