//! SMTP transport
//!
//! STARTTLS submission (port 587) through lettre's pooled async transport.
//! The pool hands each concurrent send its own connection.

use async_trait::async_trait;
use lettre::address::Address;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use uuid::Uuid;

use super::transport::{MailTransport, OutboundMessage};
use super::types::{DeliveryError, TransportVerificationError};
use crate::config::MailConfig;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    has_credentials: bool,
}

impl SmtpMailer {
    /// Build the transport. Missing credentials do not fail here, they are
    /// reported by `verify`.
    pub fn from_config(config: &MailConfig) -> Result<Self, TransportVerificationError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| TransportVerificationError::Setup(e.to_string()))?
            .port(config.smtp_port)
            .timeout(Some(config.timeout));

        if let Some(ref password) = config.password {
            builder = builder.credentials(Credentials::new(config.from.clone(), password.clone()));
        }

        log::debug!("SMTP transport: {}:{} (STARTTLS)", config.smtp_host, config.smtp_port);

        Ok(Self {
            transport: builder.build(),
            host: config.smtp_host.clone(),
            has_credentials: config.password.is_some(),
        })
    }

    fn build_message(message: &OutboundMessage, message_id: &str) -> Result<Message, DeliveryError> {
        let from = parse_address(&message.from)?;
        let to = parse_address(&message.to)?;

        Message::builder()
            .from(Mailbox::new(message.from_name.clone(), from))
            .to(Mailbox::new(message.to_name.clone(), to))
            .subject(message.subject.clone())
            .message_id(Some(message_id.to_string()))
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> Result<(), TransportVerificationError> {
        if !self.has_credentials {
            return Err(TransportVerificationError::MissingCredentials);
        }

        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportVerificationError::Connection(format!(
                "{} did not accept the connection",
                self.host
            ))),
            Err(e) => Err(TransportVerificationError::Connection(e.to_string())),
        }
    }

    async fn send(&self, message: &OutboundMessage) -> Result<String, DeliveryError> {
        let message_id = new_message_id(&message.from);
        let email = Self::build_message(message, &message_id)?;

        self.transport.send(email).await.map_err(|e| {
            if e.is_permanent() || e.is_transient() {
                DeliveryError::Rejected(e.to_string())
            } else {
                DeliveryError::Network(e.to_string())
            }
        })?;

        Ok(message_id)
    }
}

fn parse_address(raw: &str) -> Result<Address, DeliveryError> {
    raw.trim().parse::<Address>().map_err(|e| DeliveryError::InvalidAddress {
        address: raw.to_string(),
        reason: e.to_string(),
    })
}

/// `<uuid@sender-domain>`
fn new_message_id(from: &str) -> String {
    let domain = from
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim())
        .filter(|domain| !domain.is_empty())
        .unwrap_or("localhost");
    format!("<{}@{}>", Uuid::new_v4(), domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(password: Option<&str>) -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            from: "cam@example.com".to_string(),
            to: "guard@example.com".to_string(),
            password: password.map(str::to_string),
            timeout: Duration::from_secs(1),
        }
    }

    fn outbound(from: &str) -> OutboundMessage {
        OutboundMessage {
            from: from.to_string(),
            from_name: Some("Weapon Detection System".to_string()),
            to: "guard@example.com".to_string(),
            to_name: None,
            subject: "🚨 THREAT ALERT: Gun Detected (95.00% confidence)".to_string(),
            html_body: "<p>Gun</p>".to_string(),
            text_body: "Gun".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_verification_offline() {
        let mailer = SmtpMailer::from_config(&config(None)).unwrap();
        assert_eq!(
            mailer.verify().await.unwrap_err(),
            TransportVerificationError::MissingCredentials
        );
    }

    #[test]
    fn test_message_id_uses_sender_domain() {
        let id = new_message_id("cam@example.com");
        assert!(id.starts_with('<'));
        assert!(id.ends_with("@example.com>"));
        assert!(new_message_id("nobody").ends_with("@localhost>"));
    }

    #[test]
    fn test_build_message_headers() {
        let email = SmtpMailer::build_message(&outbound("cam@example.com"), "<id-1@example.com>").unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Message-ID: <id-1@example.com>"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("guard@example.com"));
    }

    #[test]
    fn test_invalid_sender_is_rejected_before_sending() {
        let err = SmtpMailer::build_message(&outbound("not an address"), "<x@y>").unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidAddress { .. }));
    }
}
