//! Alert Dispatcher
//!
//! Sends composed alerts through the shared transport. One attempt per
//! call, bounded by a timeout. Retry policy belongs to the caller.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::transport::{MailTransport, OutboundMessage};
use super::types::{DeliveryError, DeliveryResult, MailRecipientConfig, TransportVerificationError, VerificationState};
use crate::constants::SENDER_DISPLAY_NAME;
use crate::logic::alert::AlertPayload;

pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    sender: String,
    sender_name: Option<String>,
    timeout: Duration,
    state: RwLock<VerificationState>,
}

impl Dispatcher {
    /// Always constructible. Call `verify` once at startup.
    pub fn new(transport: Arc<dyn MailTransport>, sender: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            sender: sender.into(),
            sender_name: Some(SENDER_DISPLAY_NAME.to_string()),
            timeout,
            state: RwLock::new(VerificationState::Unverified),
        }
    }

    pub fn with_sender_name(mut self, name: Option<String>) -> Self {
        self.sender_name = name;
        self
    }

    pub fn state(&self) -> VerificationState {
        self.state.read().clone()
    }

    /// Startup check. Failure is logged and recorded, never fatal:
    /// dispatch attempts still go to the live transport afterwards.
    pub async fn verify(&self) -> VerificationState {
        let outcome = match tokio::time::timeout(self.timeout, self.transport.verify()).await {
            Ok(result) => result,
            Err(_) => Err(TransportVerificationError::Timeout(self.timeout)),
        };

        let state = match outcome {
            Ok(()) => {
                log::info!("Email server is ready to send messages");
                VerificationState::Verified
            }
            Err(TransportVerificationError::MissingCredentials) => {
                log::warn!("⚠️  WARNING: EMAIL_PASSWORD not set in environment variables!");
                log::warn!("Email notifications will not work without a valid app password.");
                VerificationState::VerificationFailed(TransportVerificationError::MissingCredentials.to_string())
            }
            Err(e) => {
                log::warn!("Email transporter error: {}", e);
                VerificationState::VerificationFailed(e.to_string())
            }
        };

        *self.state.write() = state.clone();
        state
    }

    /// Send one alert. Safe to call concurrently.
    pub async fn dispatch(&self, payload: &AlertPayload, recipient: &MailRecipientConfig) -> DeliveryResult {
        let message = self.envelope(payload, recipient);

        let outcome = match tokio::time::timeout(self.timeout, self.transport.send(&message)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(self.timeout)),
        };

        match &outcome {
            Ok(message_id) => log::info!(
                "✅ Threat alert email sent for {} ({}%): {}",
                payload.object_class,
                payload.confidence_percent,
                message_id
            ),
            Err(e) => log::error!(
                "❌ Error sending threat alert email for {}: {}",
                payload.object_class,
                e
            ),
        }

        DeliveryResult::from(outcome)
    }

    fn envelope(&self, payload: &AlertPayload, recipient: &MailRecipientConfig) -> OutboundMessage {
        OutboundMessage {
            from: self.sender.clone(),
            from_name: self.sender_name.clone(),
            to: recipient.to.clone(),
            to_name: recipient.display_name.clone(),
            subject: payload.subject.clone(),
            html_body: payload.html_body.clone(),
            text_body: payload.text_body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::{compose, DetectionEvent};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;

    /// Records sent messages, optionally failing or stalling
    #[derive(Default)]
    struct FakeTransport {
        verify_error: Option<TransportVerificationError>,
        send_error: Option<DeliveryError>,
        stall: Option<Duration>,
        sent: Mutex<Vec<OutboundMessage>>,
    }

    #[async_trait]
    impl MailTransport for FakeTransport {
        async fn verify(&self) -> Result<(), TransportVerificationError> {
            match &self.verify_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        async fn send(&self, message: &OutboundMessage) -> Result<String, DeliveryError> {
            if let Some(stall) = self.stall {
                tokio::time::sleep(stall).await;
            }
            if let Some(e) = &self.send_error {
                return Err(e.clone());
            }
            let mut sent = self.sent.lock();
            sent.push(message.clone());
            Ok(format!("<msg-{}@example.com>", sent.len()))
        }
    }

    fn gun_alert() -> AlertPayload {
        let event = DetectionEvent::new("Gun", 0.95, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        compose(&event).unwrap()
    }

    fn dispatcher(transport: Arc<FakeTransport>) -> Dispatcher {
        Dispatcher::new(transport, "cam@example.com", Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_end_to_end_delivery() {
        let transport = Arc::new(FakeTransport::default());
        let dispatcher = dispatcher(transport.clone());
        let payload = gun_alert();
        assert!(payload.subject.contains("Gun"));
        assert!(payload.subject.contains("95.00%"));

        let result = dispatcher
            .dispatch(&payload, &MailRecipientConfig::new("guard@example.com"))
            .await;

        assert_eq!(result.message_id(), Some("<msg-1@example.com>"));
        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "guard@example.com");
        assert_eq!(sent[0].from_name.as_deref(), Some("Weapon Detection System"));
        assert_eq!(sent[0].subject, payload.subject);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported_not_retried() {
        let transport = Arc::new(FakeTransport {
            send_error: Some(DeliveryError::Rejected("550 mailbox unavailable".to_string())),
            ..Default::default()
        });
        let result = dispatcher(transport.clone())
            .dispatch(&gun_alert(), &MailRecipientConfig::new("guard@example.com"))
            .await;

        assert!(!result.is_success());
        assert!(!result.error().unwrap().is_empty());
        assert!(transport.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_stuck_transport_times_out() {
        let transport = Arc::new(FakeTransport {
            stall: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let result = dispatcher(transport)
            .dispatch(&gun_alert(), &MailRecipientConfig::new("guard@example.com"))
            .await;

        assert_eq!(result.error(), Some("Sending timed out after 200ms"));
    }

    #[tokio::test]
    async fn test_verification_states() {
        let ok = dispatcher(Arc::new(FakeTransport::default()));
        assert_eq!(ok.state(), VerificationState::Unverified);
        assert_eq!(ok.verify().await, VerificationState::Verified);
        assert_eq!(ok.state(), VerificationState::Verified);

        let failing = dispatcher(Arc::new(FakeTransport {
            verify_error: Some(TransportVerificationError::MissingCredentials),
            ..Default::default()
        }));
        assert!(matches!(failing.verify().await, VerificationState::VerificationFailed(_)));
    }

    #[tokio::test]
    async fn test_failed_verification_does_not_block_dispatch() {
        let transport = Arc::new(FakeTransport {
            verify_error: Some(TransportVerificationError::Connection("refused".to_string())),
            ..Default::default()
        });
        let dispatcher = dispatcher(transport);
        dispatcher.verify().await;

        let result = dispatcher
            .dispatch(&gun_alert(), &MailRecipientConfig::new("guard@example.com"))
            .await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_concurrent_dispatch() {
        let transport = Arc::new(FakeTransport::default());
        let dispatcher = Arc::new(dispatcher(transport.clone()));
        let recipient = MailRecipientConfig::new("guard@example.com");

        let mut handles = Vec::new();
        for _ in 0..10 {
            let dispatcher = dispatcher.clone();
            let recipient = recipient.clone();
            handles.push(tokio::spawn(async move {
                dispatcher.dispatch(&gun_alert(), &recipient).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().message_id().unwrap().to_string());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        assert_eq!(transport.sent.lock().len(), 10);
    }
}
