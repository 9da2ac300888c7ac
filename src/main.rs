//! threat-notify - dashboard watcher
//!
//! Polls the detection backend for stats, current detections and the
//! detection log, and raises one notification per delivered alert until
//! Ctrl-C.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::{Mutex, RwLock};

use threat_notify::config::AppConfig;
use threat_notify::constants::{APP_NAME, APP_VERSION};
use threat_notify::logic::dashboard::{
    start_detections_poll, start_stats_poll, DashboardApi, DashboardClient, DashboardState,
};
use threat_notify::logic::notify::{start_log_poll, LogNotifier, LogWatcher};

#[derive(Parser, Debug)]
#[command(name = "threat-notify", version, about = "Watch the detection dashboard for delivered threat alerts")]
struct Args {
    /// Start the camera stream before watching
    #[arg(long, conflicts_with = "stop_stream")]
    start_stream: bool,

    /// Stop the camera stream and exit
    #[arg(long)]
    stop_stream: bool,

    /// Dashboard API base URL (overrides DASHBOARD_API_URL)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    log::info!("Starting {} threat-notify v{}...", APP_NAME, APP_VERSION);

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(url) = args.api_url {
        config.dashboard.api_url = url.trim_end_matches('/').to_string();
    }

    let client: Arc<dyn DashboardApi> =
        Arc::new(DashboardClient::new(&config.dashboard).context("failed to build dashboard client")?);
    log::info!("Dashboard API: {}", config.dashboard.api_url);

    if args.stop_stream {
        let stopped = stream_control(client.as_ref(), false).await;
        return Ok(if stopped { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }
    if args.start_stream && !stream_control(client.as_ref(), true).await {
        log::warn!("Continuing without a running stream");
    }

    let state = Arc::new(RwLock::new(DashboardState::default()));
    let watcher = Arc::new(Mutex::new(LogWatcher::new(Arc::new(LogNotifier))));
    log::info!("Log watcher session {}", watcher.lock().session_id());

    let tasks = vec![
        start_log_poll(client.clone(), config.dashboard.logs_interval, watcher.clone(), state.clone()),
        start_stats_poll(client.clone(), config.dashboard.stats_interval, state.clone()),
        start_detections_poll(client.clone(), config.dashboard.detections_interval, state.clone()),
    ];

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    log::info!("Shutting down...");

    for task in tasks {
        task.shutdown().await;
    }

    let state = state.read();
    log::info!(
        "Stopped. {} notifications this session, {} failed fetches",
        watcher.lock().seen().len(),
        state.fetch_failures
    );
    Ok(ExitCode::SUCCESS)
}

/// Returns `true` when the backend reports success
async fn stream_control(client: &dyn DashboardApi, start: bool) -> bool {
    let (action, result) = if start {
        ("start", client.start_stream().await)
    } else {
        ("stop", client.stop_stream().await)
    };

    match result {
        Ok(response) if response.is_success() => {
            log::info!("Stream {}: {}", action, response.message);
            true
        }
        Ok(response) => {
            log::error!("Stream {} failed: {}", action, response.message);
            false
        }
        Err(e) => {
            log::error!("Stream {} failed: {}", action, e);
            false
        }
    }
}
