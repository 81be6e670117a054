//! Weather Warning Monitor - Main Entry Point
//!
//! Polls the KMA weather-warning feed for regions 0-9 and posts new
//! warnings to a Slack incoming webhook:
//! 1. Queries each region for the last hour of announcements
//! 2. Skips warnings already reported since startup
//! 3. Sends one aggregate message when anything is new
//!
//! Usage:
//!   cargo run --release                       # Recurring: every 5 min + hourly backup
//!   cargo run --release -- --once             # Single check, then exit
//!   cargo run --release -- --config my.toml   # Use another settings file
//!
//! Environment:
//!   SLACK_WEBHOOK_URL - Slack incoming webhook (required)
//!   KMA_AUTH_KEY      - KMA API Hub key
//!   RUST_LOG          - log filter (default: info)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use wrnmon_service::config::{ServiceConfig, AUTH_KEY_VAR, DEFAULT_SETTINGS_PATH};
use wrnmon_service::daemon::{Daemon, DaemonConfig};
use wrnmon_service::ingest::kma::KmaClient;
use wrnmon_service::logging;
use wrnmon_service::slack::SlackWebhook;

#[derive(Parser)]
#[command(name = "wrnmon", version, about = "KMA weather-warning monitor with Slack delivery")]
struct Cli {
    /// Run a single check across all regions, then exit
    #[arg(long)]
    once: bool,

    /// Settings file (missing file means defaults)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("⛈️  Weather Warning Monitor");
    println!("============================\n");

    // Load configuration before anything else; the service cannot run
    // without a delivery endpoint.
    let config = match ServiceConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            eprintln!("See .env.example and wrnmon.toml for the expected setup.\n");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.settings.logging) {
        eprintln!("\n❌ Failed to open log file: {}\n", e);
        return ExitCode::FAILURE;
    }

    if config.auth_key.is_none() {
        warn!("{} is not set; the feed will reject every request", AUTH_KEY_VAR);
    }

    let feed = match KmaClient::new(&config.settings.feed, config.auth_key.clone()) {
        Ok(feed) => feed,
        Err(e) => {
            error!(error = %e, "failed to build feed client");
            return ExitCode::FAILURE;
        }
    };

    let notifier = match SlackWebhook::new(config.webhook_url.clone(), &config.settings.delivery) {
        Ok(notifier) => notifier,
        Err(e) => {
            error!(error = %e, "failed to build webhook client");
            return ExitCode::FAILURE;
        }
    };

    let mut daemon = Daemon::with_config(DaemonConfig::from(&config.settings), feed, notifier);

    if cli.once {
        let summary = daemon.run_once();
        if summary.delivered == Some(false) {
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    info!("starting recurring monitoring, press Ctrl+C to stop");
    daemon.run()
}
