//! Per-symbol alert cooldown

use crate::constants::ALERT_COOLDOWN_SECS;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Suppresses repeated alerts for the same symbol within the cooldown window
///
/// A successful check records `now` as the symbol's last alert time, even if
/// the alert is never delivered afterwards. Entries are never evicted; the map
/// holds at most one entry per monitored symbol.
#[derive(Debug, Clone)]
pub struct AlertGate {
    cooldown: Duration,
    last_alerts: HashMap<String, DateTime<Utc>>,
}

impl Default for AlertGate {
    fn default() -> Self {
        Self::new(Duration::seconds(ALERT_COOLDOWN_SECS))
    }
}

impl AlertGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_alerts: HashMap::new(),
        }
    }

    /// Returns true and records `now` unless the symbol alerted less than
    /// one cooldown ago
    pub fn allow(&mut self, symbol: &str, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_alerts.get(symbol) {
            if now.signed_duration_since(*last) < self.cooldown {
                return false;
            }
        }

        self.last_alerts.insert(symbol.to_string(), now);
        true
    }

    /// Last recorded alert time for a symbol
    pub fn last_alert(&self, symbol: &str) -> Option<DateTime<Utc>> {
        self.last_alerts.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.last_alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_alerts.is_empty()
    }
}
