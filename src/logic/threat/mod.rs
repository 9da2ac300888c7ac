//! Threat Module
//!
//! Maps a detector confidence score to a severity tier.
//!
//! ## Structure
//! - `types`: `SeverityTier`
//! - `rules`: tier boundaries
//! - `classifier`: classification logic
//!
//! ## Usage
//! ```ignore
//! use crate::logic::threat::{classify, SeverityTier};
//!
//! match classify(0.95) {
//!     SeverityTier::High => println!("Action needed"),
//!     SeverityTier::Medium => println!("Verify"),
//!     SeverityTier::Low => println!("Monitor"),
//! }
//! ```

pub mod types;
pub mod rules;
pub mod classifier;

pub use types::SeverityTier;
pub use rules::{HIGH_THRESHOLD, MEDIUM_THRESHOLD};
pub use classifier::classify;
