//! Alert Pipeline
//!
//! gate -> compose -> dispatch for a single detection event.
//! One-shot callers (the `send-alert` binary) run without a gate: the
//! caller has already decided the event deserves an email.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::logic::alert::{AlertComposer, AlertGate, DetectionEvent, GateDecision, InvalidEventError};
use crate::logic::dispatch::{DeliveryResult, Dispatcher, MailRecipientConfig};

/// What happened to one event
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    /// Not sent: below threshold or class still cooling down
    Suppressed(GateDecision),
    /// One delivery attempt was made
    Dispatched(DeliveryResult),
}

impl AlertOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, AlertOutcome::Dispatched(result) if result.is_success())
    }
}

pub struct AlertService {
    /// `None` sends every valid event
    gate: Option<AlertGate>,
    composer: AlertComposer,
    dispatcher: Arc<Dispatcher>,
    recipient: MailRecipientConfig,
}

impl AlertService {
    pub fn new(
        gate: AlertGate,
        composer: AlertComposer,
        dispatcher: Arc<Dispatcher>,
        recipient: MailRecipientConfig,
    ) -> Self {
        Self {
            gate: Some(gate),
            composer,
            dispatcher,
            recipient,
        }
    }

    /// No threshold, no cooldown
    pub fn ungated(composer: AlertComposer, dispatcher: Arc<Dispatcher>, recipient: MailRecipientConfig) -> Self {
        Self {
            gate: None,
            composer,
            dispatcher,
            recipient,
        }
    }

    /// Gated service for long-running callers
    pub fn from_config(config: &AppConfig, composer: AlertComposer, dispatcher: Arc<Dispatcher>) -> Self {
        Self::new(
            AlertGate::new(config.alert.threshold, config.alert.cooldown),
            composer.with_utc_offset_minutes(config.alert.utc_offset_minutes),
            dispatcher,
            config.mail.recipient(),
        )
    }

    /// Ungated service for one-shot delivery
    pub fn one_shot_from_config(config: &AppConfig, composer: AlertComposer, dispatcher: Arc<Dispatcher>) -> Self {
        Self::ungated(
            composer.with_utc_offset_minutes(config.alert.utc_offset_minutes),
            dispatcher,
            config.mail.recipient(),
        )
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Handle one event. Invalid events are rejected before the gate.
    pub async fn handle(&self, event: &DetectionEvent) -> Result<AlertOutcome, InvalidEventError> {
        let confidence = event.validate()?;
        // Same key the composer renders
        let object_class = event.object_class.trim();

        if let Some(gate) = &self.gate {
            let decision = gate.check(object_class, confidence);
            if !decision.is_allowed() {
                log::info!("Alert for {} ({:.2}) suppressed: {:?}", object_class, confidence, decision);
                return Ok(AlertOutcome::Suppressed(decision));
            }
        }

        let payload = self.composer.compose(event)?;
        let result = self.dispatcher.dispatch(&payload, &self.recipient).await;

        // Cooldown only starts on a delivered alert
        if let (Some(gate), true) = (&self.gate, result.is_success()) {
            gate.record_delivery(object_class);
        }

        Ok(AlertOutcome::Dispatched(result))
    }
}
