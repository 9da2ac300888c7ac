//! send-alert - deliver one threat alert email
//!
//! Usage: `send-alert '<detection-json>'`
//! Exit code 0 on delivery, 1 on invalid input or delivery failure.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use threat_notify::config::AppConfig;
use threat_notify::logic::alert::{AlertComposer, DetectionEvent};
use threat_notify::logic::dispatch::{Dispatcher, SmtpMailer};
use threat_notify::logic::pipeline::{AlertOutcome, AlertService};

#[derive(Parser, Debug)]
#[command(name = "send-alert", version, about = "Send a threat alert email for one detection")]
struct Args {
    /// Detection event as JSON: {"class": "...", "confidence": 0.0-1.0, "timestamp": "...", "location": "..."}
    detection: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let Some(raw) = args.detection else {
        eprintln!("Usage: send-alert '<detection-json>'");
        return ExitCode::FAILURE;
    };

    match run(&raw).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(raw: &str) -> Result<()> {
    let event = DetectionEvent::from_json(raw).context("invalid detection event")?;
    let config = AppConfig::from_env().context("invalid configuration")?;

    let mailer = SmtpMailer::from_config(&config.mail).context("mail transport setup failed")?;
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(mailer), config.mail.from.clone(), config.mail.timeout));
    dispatcher.verify().await;

    let mut composer = AlertComposer::new();
    if let Ok(host) = hostname::get() {
        composer = composer.with_origin(host.to_string_lossy());
    }
    let service = AlertService::one_shot_from_config(&config, composer, dispatcher);

    match service.handle(&event).await.context("invalid detection event")? {
        AlertOutcome::Dispatched(result) => match result.message_id() {
            Some(id) => {
                println!("Email sent: {}", id);
                Ok(())
            }
            None => bail!("delivery failed: {}", result.error().unwrap_or("unknown error")),
        },
        // Unreachable without a gate
        AlertOutcome::Suppressed(decision) => bail!("alert suppressed: {:?}", decision),
    }
}
