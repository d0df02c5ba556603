//! netwatchd - Local network presence monitor daemon
//!
//! The daemon wires the monitor core to the host:
//! - A system snapshot provider (interface enumeration + SSID scan)
//! - A logging presenter consuming the event stream
//! - Signal-driven shutdown observed at the loop's suspension points

use std::sync::Arc;

use clap::Parser;
use netwatch_monitor::NetworkMonitor;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod presenter;
mod provider;

use config::DaemonConfig;
use error::DaemonResult;
use presenter::LogPresenter;
use provider::SystemProvider;

/// Netwatch daemon CLI
#[derive(Parser)]
#[command(name = "netwatchd")]
#[command(about = "Netwatch - local network presence monitor", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "NETWATCH_CONFIG")]
    config: Option<String>,

    /// Polling interval in seconds (overrides config)
    #[arg(short, long, env = "NETWATCH_INTERVAL")]
    interval: Option<u64>,

    /// Disable the wireless SSID scan
    #[arg(long, env = "NETWATCH_NO_WIFI")]
    no_wifi: bool,

    /// Log level
    #[arg(long, env = "NETWATCH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "NETWATCH_LOG_JSON")]
    json: bool,

    /// Run a single poll cycle, print the resulting state as JSON, and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration, then apply CLI overrides.
    let mut config = DaemonConfig::load(cli.config.as_deref())?;
    if let Some(interval) = cli.interval {
        config.monitor.poll_interval_secs = interval;
    }
    if cli.no_wifi {
        config.provider.wifi_scan = false;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let provider = Arc::new(SystemProvider::new(config.provider.clone()));
    let mut monitor = NetworkMonitor::new(config.monitor.clone(), provider);

    if cli.once {
        monitor.poll_once().await;
        let state = monitor.state().borrow().clone();
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    info!(
        interval_secs = config.monitor.poll_interval_secs,
        wifi_scan = config.provider.wifi_scan,
        "=== netwatchd starting ==="
    );

    // Attach readers before spawning; the monitor is the single writer.
    let state = monitor.state();
    let presenter = LogPresenter::new(monitor.subscribe(), monitor.state());
    let presenter_handle = tokio::spawn(presenter.run());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor_handle = tokio::spawn(monitor.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("=== shutdown signal received ===");

    // The loop observes the flag at its next suspension point.
    let _ = shutdown_tx.send(true);
    let _ = monitor_handle.await;
    let _ = presenter_handle.await;

    let final_state = state.borrow().clone();
    info!(
        completed_cycles = final_state.completed_cycles,
        skipped_cycles = final_state.skipped_cycles,
        connections = final_state.snapshot.connections.len(),
        wifi_networks = final_state.snapshot.wifi_networks.len(),
        alerts = final_state.alerts.len(),
        "=== final statistics ==="
    );

    Ok(())
}
