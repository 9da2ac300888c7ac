//! Configuration module
//!
//! Reads process configuration from the environment. Binaries call
//! `dotenvy::dotenv().ok()` first so a local `.env` file is honoured.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::*;
use crate::logic::dispatch::MailRecipientConfig;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("{key} is out of range: {reason}")]
    OutOfRange { key: String, reason: String },
}

/// Outbound mail configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Sender address, also the SMTP username
    pub from: String,
    /// Alert recipient
    pub to: String,
    /// App password. `None` leaves the transport unauthenticated.
    pub password: Option<String>,
    /// Bound on one send attempt
    pub timeout: Duration,
}

impl MailConfig {
    pub fn recipient(&self) -> MailRecipientConfig {
        MailRecipientConfig::new(self.to.clone())
    }
}

/// Alert gating and rendering configuration
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Minimum confidence for an email
    pub threshold: f64,
    /// Per-class cooldown after a delivered alert
    pub cooldown: Duration,
    /// Offset used to render timestamps for the recipient
    pub utc_offset_minutes: i32,
}

/// Dashboard backend configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub fetch_timeout: Duration,
    pub logs_interval: Duration,
    pub stats_interval: Duration,
    pub detections_interval: Duration,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mail: MailConfig,
    pub alert: AlertConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mail = MailConfig {
            smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: parse_or(&get, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            from: get("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            to: get("EMAIL_TO").unwrap_or_else(|| DEFAULT_EMAIL_TO.to_string()),
            password: get("EMAIL_PASSWORD"),
            timeout: Duration::from_secs(parse_or(&get, "SMTP_TIMEOUT_SECS", DEFAULT_SMTP_TIMEOUT_SECS)?),
        };

        let alert = AlertConfig {
            threshold: parse_or(&get, "ALERT_THRESHOLD", DEFAULT_ALERT_THRESHOLD)?,
            cooldown: Duration::from_secs(parse_or(&get, "ALERT_COOLDOWN_SECS", DEFAULT_ALERT_COOLDOWN_SECS)?),
            utc_offset_minutes: parse_or(&get, "ALERT_UTC_OFFSET_MINUTES", 0)?,
        };

        let dashboard = DashboardConfig {
            api_url: get("DASHBOARD_API_URL")
                .unwrap_or_else(|| DEFAULT_DASHBOARD_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            fetch_timeout: Duration::from_secs(parse_or(&get, "FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?),
            logs_interval: Duration::from_millis(parse_or(&get, "LOGS_POLL_INTERVAL_MS", DEFAULT_LOGS_POLL_INTERVAL_MS)?),
            stats_interval: Duration::from_millis(parse_or(&get, "STATS_POLL_INTERVAL_MS", DEFAULT_STATS_POLL_INTERVAL_MS)?),
            detections_interval: Duration::from_millis(parse_or(
                &get,
                "DETECTIONS_POLL_INTERVAL_MS",
                DEFAULT_DETECTIONS_POLL_INTERVAL_MS,
            )?),
        };

        let config = Self { mail, alert, dashboard };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.alert.threshold) {
            return Err(out_of_range("ALERT_THRESHOLD", "must be within [0, 1]"));
        }
        if self.alert.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(out_of_range("ALERT_UTC_OFFSET_MINUTES", "must be less than one day"));
        }
        if self.mail.smtp_port == 0 {
            return Err(out_of_range("SMTP_PORT", "must be non-zero"));
        }
        // Timeouts and intervals must be finite and non-zero.
        let durations = [
            ("SMTP_TIMEOUT_SECS", self.mail.timeout),
            ("FETCH_TIMEOUT_SECS", self.dashboard.fetch_timeout),
            ("LOGS_POLL_INTERVAL_MS", self.dashboard.logs_interval),
            ("STATS_POLL_INTERVAL_MS", self.dashboard.stats_interval),
            ("DETECTIONS_POLL_INTERVAL_MS", self.dashboard.detections_interval),
        ];
        for (key, value) in durations {
            if value.is_zero() {
                return Err(out_of_range(key, "must be greater than zero"));
            }
        }
        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn out_of_range(key: &str, reason: &str) -> ConfigError {
    ConfigError::OutOfRange {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
