//! Dispatch Module - Outbound Email Alerts
//!
//! This module handles:
//! - Transport verification at startup
//! - Sending composed alerts (one attempt, bounded by a timeout)
//! - Reporting delivery outcome to the caller

pub mod types;
pub mod transport;
pub mod smtp;
pub mod dispatcher;

pub use types::{
    DeliveryError, DeliveryResult, MailRecipientConfig, TransportVerificationError, VerificationState,
};
pub use transport::{MailTransport, OutboundMessage, SerializedTransport};
pub use smtp::SmtpMailer;
pub use dispatcher::Dispatcher;
