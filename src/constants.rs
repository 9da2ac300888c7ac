//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Runtime overrides are read from the environment in `config.rs`.

/// Default dashboard backend URL
///
/// For development: http://localhost:8000
pub const DEFAULT_DASHBOARD_API_URL: &str = "http://localhost:8000";

/// Default SMTP relay (STARTTLS submission)
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Submission port. Implicit TLS (465) is not supported.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Bound on a single send attempt (seconds)
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 10;

/// Default sender address
pub const DEFAULT_EMAIL_FROM: &str = "alerts@localhost";

/// Default recipient address
pub const DEFAULT_EMAIL_TO: &str = "security@localhost";

/// Display name used on the From header
pub const SENDER_DISPLAY_NAME: &str = "Weapon Detection System";

/// Minimum confidence for an email alert (50%)
pub const DEFAULT_ALERT_THRESHOLD: f64 = 0.5;

/// Max one email per object class per cooldown window (seconds)
pub const DEFAULT_ALERT_COOLDOWN_SECS: u64 = 60;

/// Location used when a detection does not name its camera
pub const DEFAULT_LOCATION: &str = "CCTV-1";

/// Bound on a single dashboard request (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Poll interval for `/api/logs` (milliseconds)
pub const DEFAULT_LOGS_POLL_INTERVAL_MS: u64 = 2_000;

/// Poll interval for `/api/stats` (milliseconds)
pub const DEFAULT_STATS_POLL_INTERVAL_MS: u64 = 2_000;

/// Poll interval for `/api/detections` (milliseconds)
pub const DEFAULT_DETECTIONS_POLL_INTERVAL_MS: u64 = 1_000;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "AI-Based Weapon Detection System";
