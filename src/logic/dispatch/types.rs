//! Dispatch Types

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// RECIPIENT
// ============================================================================

/// Where an alert is delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRecipientConfig {
    pub to: String,
    pub display_name: Option<String>,
}

impl MailRecipientConfig {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DeliveryResult {
    /// Accepted by the relay. `message_id` is assigned by the transport.
    Delivered { message_id: String },
    /// Not delivered. No retry has been attempted.
    Failed { error: String },
}

impl DeliveryResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryResult::Delivered { .. })
    }

    pub fn message_id(&self) -> Option<&str> {
        match self {
            DeliveryResult::Delivered { message_id } => Some(message_id),
            DeliveryResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DeliveryResult::Delivered { .. } => None,
            DeliveryResult::Failed { error } => Some(error),
        }
    }
}

impl From<Result<String, DeliveryError>> for DeliveryResult {
    fn from(result: Result<String, DeliveryError>) -> Self {
        match result {
            Ok(message_id) => DeliveryResult::Delivered { message_id },
            Err(e) => DeliveryResult::Failed { error: e.to_string() },
        }
    }
}

/// Transport verification state, observable after startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum VerificationState {
    Unverified,
    Verified,
    VerificationFailed(String),
}

impl VerificationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationState::Unverified => "unverified",
            VerificationState::Verified => "verified",
            VerificationState::VerificationFailed(_) => "verification_failed",
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Startup credential/connection check failed. Non-fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportVerificationError {
    #[error("EMAIL_PASSWORD is not set, email notifications will not work without an app password")]
    MissingCredentials,

    #[error("Transport setup failed: {0}")]
    Setup(String),

    #[error("Mail server not reachable: {0}")]
    Connection(String),

    #[error("Verification timed out after {0:?}")]
    Timeout(Duration),
}

/// A single send attempt failed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Relay rejected message: {0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Sending timed out after {0:?}")]
    Timeout(Duration),
}
