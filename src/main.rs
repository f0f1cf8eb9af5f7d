//! Momentum alert bot binary
//!
//! # Usage
//! ```sh
//! TELEGRAM_TOKEN=123:abc CHAT_ID=42 cargo run --release
//! ```
//!
//! # Environment Variables
//! - `TELEGRAM_TOKEN`, `CHAT_ID` - required
//! - `ALERT_SYMBOLS` - comma-separated pairs (default: BTC, ETH, BNB, SOL, ADA against USDT)
//! - `CHECK_INTERVAL_SECS` - cycle period (default: 300)
//! - `RSI_OVERSOLD` / `RSI_OVERBOUGHT` - bucket thresholds (default: 30 / 70)
//! - `RUST_LOG` - log filter (default: info)

use anyhow::{Context, Result};
use momentum_alert_bot::{AlertMonitor, Config};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with(stdout_layer)
        .init();

    info!("Momentum Alert Bot {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;
    info!(?config, "Configuration loaded");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    let monitor = AlertMonitor::from_config(&config, shutdown_rx)?;
    monitor
        .run()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Startup failed"))
        .context("alert monitor stopped")?;

    info!("Shutdown complete");
    Ok(())
}

/// `RUST_LOG` directives when set and valid, `info` otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("warn")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }
}
