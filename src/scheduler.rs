//! Periodic cycle scheduling
//!
//! The scheduler runs a `CycleTask` back to back on a fixed period: after a
//! cycle it sleeps for `interval - elapsed` (never negative), so slow cycles
//! shorten the pause instead of stretching the cadence. A cycle that returns
//! an error or panics is logged and followed by the error backoff.
//!
//! ```text
//! RUNNING --(cycle)--> sleep(max(0, interval - elapsed)) --> RUNNING
//!    |                  sleep(error_backoff) on failure
//!    +--(shutdown flag / cycle limit)--> STOPPED
//! ```
//!
//! Time comes from a `Clock`, so tests drive the loop with a fake clock and a
//! bounded number of cycles instead of waiting on the wall clock.

use crate::constants::ERROR_BACKOFF_SECS;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Source of wall-clock time and sleeps
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

/// Real time backed by tokio timers
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// One unit of periodic work
#[async_trait]
pub trait CycleTask: Send {
    type Error: fmt::Display + Send;

    async fn run_cycle(&mut self) -> Result<(), Self::Error>;
}

/// Why the scheduler left the running state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// Shutdown flag was raised
    #[default]
    Interrupted,
    /// Configured number of cycles completed
    CycleLimit,
}

/// Summary returned once the scheduler stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerReport {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub stop_reason: StopReason,
}

/// Runs a cycle task on a fixed period until shutdown
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    interval: Duration,
    error_backoff: Duration,
    max_cycles: Option<u64>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            error_backoff: Duration::from_secs(ERROR_BACKOFF_SECS),
            max_cycles: None,
        }
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Stops after `cycles` cycles instead of running until shutdown
    pub fn with_max_cycles(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    fn limit_reached(&self, cycles: u64) -> bool {
        self.max_cycles.is_some_and(|max| cycles >= max)
    }

    /// Runs until the shutdown flag is raised or the cycle limit is reached
    ///
    /// The flag is checked before each cycle and while sleeping between
    /// cycles; a cycle in progress is never cut short by the scheduler.
    pub async fn run<T>(&self, task: &mut T, shutdown: &mut watch::Receiver<bool>) -> SchedulerReport
    where
        T: CycleTask + ?Sized,
    {
        let mut report = SchedulerReport::default();

        loop {
            if *shutdown.borrow() {
                report.stop_reason = StopReason::Interrupted;
                break;
            }
            if self.limit_reached(report.cycles) {
                report.stop_reason = StopReason::CycleLimit;
                break;
            }

            let started = self.clock.now();
            let outcome = AssertUnwindSafe(task.run_cycle()).catch_unwind().await;
            report.cycles += 1;

            let wait = match outcome {
                Ok(Ok(())) => {
                    let elapsed = (self.clock.now() - started)
                        .to_std()
                        .unwrap_or(Duration::ZERO);
                    self.interval.saturating_sub(elapsed)
                }
                Ok(Err(e)) => {
                    report.failed_cycles += 1;
                    tracing::error!(
                        error = %e,
                        backoff_secs = self.error_backoff.as_secs(),
                        "Monitoring cycle failed"
                    );
                    self.error_backoff
                }
                Err(panic) => {
                    report.failed_cycles += 1;
                    tracing::error!(
                        panic = panic_message(panic.as_ref()),
                        backoff_secs = self.error_backoff.as_secs(),
                        "Monitoring cycle panicked"
                    );
                    self.error_backoff
                }
            };

            if self.limit_reached(report.cycles) {
                report.stop_reason = StopReason::CycleLimit;
                break;
            }

            tracing::info!(sleep_secs = wait.as_secs(), "Next cycle scheduled");
            tokio::select! {
                biased;
                _ = shutdown_requested(shutdown) => {
                    report.stop_reason = StopReason::Interrupted;
                    break;
                }
                _ = self.clock.sleep(wait) => {}
            }
        }

        tracing::info!(
            cycles = report.cycles,
            failed_cycles = report.failed_cycles,
            reason = ?report.stop_reason,
            "Scheduler stopped"
        );
        report
    }
}

/// Resolves once the flag is raised; never resolves if the sender is gone
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
