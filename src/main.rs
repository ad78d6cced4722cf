//! Court booking engine service binary
//!
//! Runs the booking engine with its background tasks until SIGINT/SIGTERM.
//!
//! ```sh
//! # Run with default config (~/.config/court-booking/config.toml)
//! court-booking
//!
//! # Custom config path
//! court-booking --config /etc/court-booking/config.toml
//!
//! # Validate config without starting
//! court-booking --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use court_booking::config::AppConfig;
use court_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Court booking engine: slot reservation and payment confirmation.
#[derive(Parser, Debug)]
#[command(
    name = "court-booking",
    version,
    about = "Court slot reservation and payment confirmation engine",
    long_about = "Court slot reservation and payment confirmation engine.\n\n\
                  Default config: ~/.config/court-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "COURT_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(court_booking::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
    };

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    if cli.check {
        println!("Configuration OK: {}", config_path.display());
        println!("  database:      {}", config.database.url);
        println!("  horizon_days:  {}", config.booking.horizon_days);
        println!(
            "  pending_ttl:   {}",
            config
                .payments
                .pending_ttl_hours
                .map_or_else(|| "disabled".to_string(), |h| format!("{}h", h))
        );
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start engine ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Court booking engine running. Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;
    Ok(())
}
