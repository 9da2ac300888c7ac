//! Logic Module - Threat Notification Pipeline
//!
//! ## Structure
//! - `threat/` - Confidence -> severity tier
//! - `alert/` - Detection events, gating, alert composition
//! - `dispatch/` - Mail transport and delivery
//! - `pipeline` - gate -> compose -> dispatch per event
//! - `dashboard/` - Detection backend client and polling
//! - `notify/` - Delivery notifications, deduplicated per session

pub mod threat;
pub mod alert;
pub mod dispatch;
pub mod pipeline;
pub mod dashboard;
pub mod notify;
