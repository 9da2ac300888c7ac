//! Mail Transport seam
//!
//! The dispatcher talks to mail relays through `MailTransport` so it can run
//! against a fake in tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::types::{DeliveryError, TransportVerificationError};

/// Fully addressed message, transport-neutral
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub from_name: Option<String>,
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Check credentials and connectivity
    async fn verify(&self) -> Result<(), TransportVerificationError>;

    /// Send one message, returning the transport-assigned message id
    async fn send(&self, message: &OutboundMessage) -> Result<String, DeliveryError>;
}

/// Serializes access to a transport that cannot handle concurrent sends
pub struct SerializedTransport<T> {
    inner: T,
    lock: Mutex<()>,
}

impl<T> SerializedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: MailTransport> MailTransport for SerializedTransport<T> {
    async fn verify(&self) -> Result<(), TransportVerificationError> {
        let _guard = self.lock.lock().await;
        self.inner.verify().await
    }

    async fn send(&self, message: &OutboundMessage) -> Result<String, DeliveryError> {
        let _guard = self.lock.lock().await;
        self.inner.send(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Fails if two sends overlap
    struct ExclusiveOnly {
        active: AtomicUsize,
        max_seen: AtomicUsize,
    }

    #[async_trait]
    impl MailTransport for ExclusiveOnly {
        async fn verify(&self) -> Result<(), TransportVerificationError> {
            Ok(())
        }

        async fn send(&self, message: &OutboundMessage) -> Result<String, DeliveryError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(format!("<{}>", message.subject))
        }
    }

    fn message(subject: &str) -> OutboundMessage {
        OutboundMessage {
            from: "a@example.com".to_string(),
            from_name: None,
            to: "b@example.com".to_string(),
            to_name: None,
            subject: subject.to_string(),
            html_body: String::new(),
            text_body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_serialized_sends_never_overlap() {
        let transport = Arc::new(SerializedTransport::new(ExclusiveOnly {
            active: AtomicUsize::new(0),
            max_seen: AtomicUsize::new(0),
        }));

        let mut handles = Vec::new();
        for i in 0..8 {
            let transport = transport.clone();
            handles.push(tokio::spawn(async move {
                transport.send(&message(&format!("m{}", i))).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        let transport = Arc::try_unwrap(transport).ok().unwrap().into_inner();
        assert_eq!(transport.max_seen.load(Ordering::SeqCst), 1);
    }
}
