//! # Momentum Alert Bot
//!
//! Polls the Binance 24h ticker for a fixed list of pairs, maps the 24h
//! percent change onto a coarse pseudo-RSI bucket, and pushes Telegram alerts
//! when threshold rules fire. A per-symbol cooldown keeps one pair from
//! flooding the chat.
//!
//! ## Important: the "RSI" is a lookup table
//!
//! There is no price history and no smoothing. The bucket is a step function
//! over a single number, see [`evaluator::rsi_bucket`].
//!
//! ## Architecture
//!
//! ```text
//! Scheduler (every CHECK_INTERVAL_SECS, period not delay)
//!     ↓
//! AlertMonitor::check_symbols (one symbol at a time, 2s apart)
//!     ↓
//! MarketDataProvider (Binance) → SignalEvaluator → AlertGate → Notifier (Telegram)
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use momentum_alert_bot::{AlertMonitor, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! tokio::spawn(async move {
//!     let _ = tokio::signal::ctrl_c().await;
//!     let _ = shutdown_tx.send(true);
//! });
//!
//! AlertMonitor::from_config(&config, shutdown_rx)?.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod cooldown;
pub mod error;
pub mod evaluator;
pub mod message;
pub mod metrics;
pub mod monitor;
pub mod notifier;
pub mod provider;
pub mod providers;
pub mod scheduler;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use cooldown::AlertGate;
pub use error::{ConfigError, MonitorError, NotifyError, ProviderError};
pub use evaluator::{rsi_bucket, SignalEvaluator};
pub use metrics::ProviderMetrics;
pub use monitor::{AlertMonitor, CycleSummary, SymbolOutcome};
pub use notifier::{Delivery, MessageSender, Notifier, TelegramSender};
pub use provider::MarketDataProvider;
pub use providers::BinanceProvider;
pub use scheduler::{Clock, CycleTask, Scheduler, SchedulerReport, StopReason, SystemClock};
pub use types::{RsiReading, Signal, SignalKind, TickerSnapshot};
