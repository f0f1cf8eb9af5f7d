//! Alert monitor service
//!
//! Ties the pieces together: for every configured symbol, in order,
//! fetch -> evaluate -> signals -> cooldown gate -> notify, with a short pause
//! between symbols. The `Scheduler` repeats this on the configured period.

use crate::{
    config::Config,
    constants::{DEFAULT_SYMBOLS, SYMBOL_PAUSE_SECS},
    cooldown::AlertGate,
    error::{MonitorError, ProviderError},
    evaluator::SignalEvaluator,
    message::{format_alert, format_price, format_startup, SHUTDOWN_MESSAGE},
    metrics::{FetchMetrics, ProviderMetrics},
    notifier::{Delivery, MessageSender, Notifier, TelegramSender},
    provider::MarketDataProvider,
    providers::BinanceProvider,
    scheduler::{
        panic_message, Clock, CycleTask, Scheduler, SchedulerReport, StopReason, SystemClock,
    },
    types::TickerSnapshot,
};
use async_trait::async_trait;
use chrono::Local;
use futures::FutureExt;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// What happened to one symbol in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOutcome {
    /// No signal fired
    Quiet,
    /// Signals fired but the symbol alerted recently
    CoolingDown { signals: usize },
    /// Alert delivered
    Alerted { signals: usize, delivery: Delivery },
    /// Alert passed the gate but could not be delivered
    DeliveryFailed { signals: usize },
}

/// Per-cycle tally
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub checked: usize,
    pub no_data: usize,
    pub quiet: usize,
    pub cooling_down: usize,
    pub alerted: usize,
    pub delivery_failed: usize,
    /// Cycle ended early because shutdown was requested
    pub interrupted: bool,
}

impl CycleSummary {
    fn record(&mut self, outcome: SymbolOutcome) {
        self.checked += 1;
        match outcome {
            SymbolOutcome::Quiet => self.quiet += 1,
            SymbolOutcome::CoolingDown { .. } => self.cooling_down += 1,
            SymbolOutcome::Alerted { .. } => self.alerted += 1,
            SymbolOutcome::DeliveryFailed { .. } => self.delivery_failed += 1,
        }
    }

    fn record_no_data(&mut self) {
        self.checked += 1;
        self.no_data += 1;
    }
}

/// Poll-evaluate-notify loop over a fixed list of symbols
pub struct AlertMonitor {
    provider: Arc<dyn MarketDataProvider>,
    notifier: Notifier,
    evaluator: SignalEvaluator,
    gate: AlertGate,
    metrics: FetchMetrics,
    clock: Arc<dyn Clock>,
    symbols: Vec<String>,
    check_interval: Duration,
    symbol_pause: Duration,
    max_cycles: Option<u64>,
    shutdown: watch::Receiver<bool>,
}

impl AlertMonitor {
    /// Creates a monitor with explicit collaborators
    ///
    /// This is primarily for testing. Use `from_config()` in production code.
    pub fn new(
        config: &Config,
        provider: Arc<dyn MarketDataProvider>,
        sender: Arc<dyn MessageSender>,
        clock: Arc<dyn Clock>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let metrics = FetchMetrics::new(provider.provider_name());

        Self {
            provider,
            notifier: Notifier::new(sender, config.chat_id.clone()),
            evaluator: SignalEvaluator::new(config.rsi_oversold, config.rsi_overbought),
            gate: AlertGate::default(),
            metrics,
            clock,
            symbols: config.symbols.clone(),
            check_interval: config.check_interval,
            symbol_pause: Duration::from_secs(SYMBOL_PAUSE_SECS),
            max_cycles: None,
            shutdown,
        }
    }

    /// Creates a monitor wired to Binance, Telegram and the system clock
    pub fn from_config(
        config: &Config,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, MonitorError> {
        let provider = BinanceProvider::with_base_url(&config.exchange_base_url)
            .map_err(MonitorError::ProviderSetup)?;
        let sender = TelegramSender::with_base_url(&config.telegram_base_url, &config.telegram_token)
            .map_err(MonitorError::NotifierSetup)?;

        Ok(Self::new(
            config,
            Arc::new(provider),
            Arc::new(sender),
            Arc::new(SystemClock),
            shutdown,
        ))
    }

    /// Stops `run` after the given number of cycles
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    pub fn gate(&self) -> &AlertGate {
        &self.gate
    }

    pub fn provider_metrics(&self) -> ProviderMetrics {
        self.metrics.snapshot()
    }

    /// Probes connectivity, announces startup, runs cycles until shutdown,
    /// then announces shutdown
    ///
    /// A failed probe aborts before anything is sent.
    pub async fn run(mut self) -> Result<SchedulerReport, MonitorError> {
        tracing::info!(
            provider = self.provider.provider_name(),
            symbols = ?self.symbols,
            interval_secs = self.check_interval.as_secs(),
            "Starting momentum alert bot"
        );

        self.probe().await?;

        let startup = format_startup(
            &self.symbols,
            self.check_interval,
            self.evaluator.oversold(),
            self.evaluator.overbought(),
        );
        if !self.notifier.notify(&startup).await {
            tracing::warn!("Startup notice was not delivered");
        }

        let mut scheduler = Scheduler::new(self.clock.clone(), self.check_interval);
        if let Some(cycles) = self.max_cycles {
            scheduler = scheduler.with_max_cycles(cycles);
        }

        let mut shutdown = self.shutdown.clone();
        let report = scheduler.run(&mut self, &mut shutdown).await;

        if report.stop_reason == StopReason::Interrupted {
            tracing::info!("Bot stopped by interrupt");
        }
        if !self.notifier.notify(SHUTDOWN_MESSAGE).await {
            tracing::warn!("Shutdown notice was not delivered");
        }

        Ok(report)
    }

    /// Single fetch of the first configured symbol
    pub async fn probe(&mut self) -> Result<TickerSnapshot, MonitorError> {
        let symbol = self
            .symbols
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_SYMBOLS[0].to_string());

        let snapshot = self
            .fetch(&symbol)
            .await
            .map_err(|source| MonitorError::Probe {
                symbol: symbol.clone(),
                source,
            })?;

        tracing::info!(
            symbol = %symbol,
            price = %format_price(snapshot.last_price, 2),
            "Connection OK"
        );
        Ok(snapshot)
    }

    /// Runs one pass over every configured symbol
    ///
    /// Failures, panics included, are isolated per symbol. Shutdown is
    /// honoured between symbols.
    pub async fn check_symbols(&mut self) -> CycleSummary {
        tracing::info!(symbols = self.symbols.len(), "Starting monitoring cycle");
        let mut summary = CycleSummary::default();
        let symbols = self.symbols.clone();

        for (idx, symbol) in symbols.iter().enumerate() {
            if idx > 0 {
                self.clock.sleep(self.symbol_pause).await;
            }

            let stop = *self.shutdown.borrow();
            if stop {
                summary.interrupted = true;
                break;
            }

            match AssertUnwindSafe(self.monitor_symbol(symbol)).catch_unwind().await {
                Ok(Ok(outcome)) => summary.record(outcome),
                Ok(Err(e)) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Skipping symbol this cycle");
                    summary.record_no_data();
                }
                Err(panic) => {
                    tracing::error!(
                        symbol = %symbol,
                        panic = panic_message(panic.as_ref()),
                        "Symbol check panicked, skipping symbol this cycle"
                    );
                    summary.record_no_data();
                }
            }
        }

        let metrics = self.metrics.snapshot();
        tracing::info!(
            checked = summary.checked,
            no_data = summary.no_data,
            quiet = summary.quiet,
            cooling_down = summary.cooling_down,
            alerted = summary.alerted,
            delivery_failed = summary.delivery_failed,
            interrupted = summary.interrupted,
            fetch_p50_ms = metrics.latency_p50_ms,
            fetch_p99_ms = metrics.latency_p99_ms,
            fetch_success_rate = metrics.success_rate,
            "Monitoring cycle complete"
        );

        summary
    }

    /// Fetch, evaluate, gate and notify for one symbol
    pub async fn monitor_symbol(&mut self, symbol: &str) -> Result<SymbolOutcome, MonitorError> {
        tracing::debug!(symbol, "Monitoring symbol");

        let snapshot = self
            .fetch(symbol)
            .await
            .map_err(|source| MonitorError::Fetch {
                symbol: symbol.to_string(),
                source,
            })?;

        let reading = self.evaluator.evaluate(snapshot);
        let signals = self.evaluator.signals(&reading);

        if signals.is_empty() {
            tracing::info!(
                symbol,
                bucket = reading.bucket,
                change_24h = reading.change_24h_percent(),
                "No signals"
            );
            return Ok(SymbolOutcome::Quiet);
        }

        let kinds: Vec<&str> = signals.iter().map(|signal| signal.kind.label()).collect();
        tracing::debug!(symbol, bucket = reading.bucket, ?kinds, "Signals fired");

        let now = self.clock.now();
        if !self.gate.allow(symbol, now) {
            tracing::info!(symbol, ?kinds, "Signals suppressed, cooling down");
            return Ok(SymbolOutcome::CoolingDown {
                signals: signals.len(),
            });
        }

        let message = format_alert(&reading, &signals, &now.with_timezone(&Local));
        match self.notifier.send(&message).await {
            Ok(delivery) => {
                tracing::info!(symbol, ?kinds, ?delivery, "Alert sent");
                Ok(SymbolOutcome::Alerted {
                    signals: signals.len(),
                    delivery,
                })
            }
            Err(e) => {
                tracing::error!(symbol, ?kinds, error = %e, "Failed to send alert");
                Ok(SymbolOutcome::DeliveryFailed {
                    signals: signals.len(),
                })
            }
        }
    }

    async fn fetch(&mut self, symbol: &str) -> Result<TickerSnapshot, ProviderError> {
        let start = Instant::now();
        let result = self.provider.fetch_ticker(symbol).await;
        self.metrics.record(start.elapsed(), result.is_ok());
        result
    }
}

#[async_trait]
impl CycleTask for AlertMonitor {
    type Error = Infallible;

    async fn run_cycle(&mut self) -> Result<(), Infallible> {
        self.check_symbols().await;
        Ok(())
    }
}
