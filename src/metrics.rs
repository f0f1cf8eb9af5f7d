//! Fetch health metrics
//!
//! Tracks a rolling window of ticker fetch latencies and outcomes. Only the
//! monitoring loop touches it, so no locking is involved.

use crate::constants::METRICS_WINDOW;
use std::collections::VecDeque;
use std::time::Duration;

/// Snapshot of fetch health for one provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderMetrics {
    /// Name of the provider
    pub provider_name: String,
    /// 50th percentile latency of successful fetches in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful fetches in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate over the process lifetime (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of fetches
    pub total_requests: u64,
    /// Number of failed fetches
    pub failed_requests: u64,
}

impl ProviderMetrics {
    /// Creates metrics with no data
    pub fn empty(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

/// Collects fetch samples and derives `ProviderMetrics`
#[derive(Debug, Clone)]
pub struct FetchMetrics {
    provider_name: String,
    samples: VecDeque<LatencySample>,
    total_requests: u64,
    failed_requests: u64,
}

impl FetchMetrics {
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            samples: VecDeque::with_capacity(METRICS_WINDOW),
            total_requests: 0,
            failed_requests: 0,
        }
    }

    /// Records one fetch with its duration and outcome
    pub fn record(&mut self, duration: Duration, success: bool) {
        self.total_requests += 1;
        if !success {
            self.failed_requests += 1;
        }

        if self.samples.len() >= METRICS_WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(LatencySample {
            duration_ms: duration.as_secs_f64() * 1000.0,
            success,
        });
    }

    pub fn snapshot(&self) -> ProviderMetrics {
        if self.samples.is_empty() {
            return ProviderMetrics::empty(&self.provider_name);
        }

        let mut latencies: Vec<f64> = self
            .samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ProviderMetrics {
            provider_name: self.provider_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: (self.total_requests - self.failed_requests) as f64
                / self.total_requests as f64,
            total_requests: self.total_requests,
            failed_requests: self.failed_requests,
        }
    }
}

/// Nearest-rank percentile over already sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
