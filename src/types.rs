//! Types for the momentum alert bot

use crate::constants::QUOTE_ASSET;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time 24h ticker for one trading pair
///
/// Fetched fresh every cycle and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    /// Exchange symbol, e.g. `BTCUSDT`
    pub symbol: String,

    /// Last traded price in quote currency
    pub last_price: f64,

    /// Percent price change over the last 24 hours
    pub change_24h_percent: f64,

    /// 24h traded volume in base-asset units
    pub volume: f64,
}

impl TickerSnapshot {
    /// Create a new snapshot
    pub fn new(
        symbol: impl Into<String>,
        last_price: f64,
        change_24h_percent: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            last_price,
            change_24h_percent,
            volume,
        }
    }

    /// Human-readable pair, e.g. `BTC/USDT`
    pub fn display_pair(&self) -> String {
        display_pair(&self.symbol)
    }
}

/// Renders an exchange symbol as `BASE/QUOTE` when the quote asset is known
pub fn display_pair(symbol: &str) -> String {
    match symbol.strip_suffix(QUOTE_ASSET) {
        Some(base) if !base.is_empty() => format!("{}/{}", base, QUOTE_ASSET),
        _ => symbol.to_string(),
    }
}

/// A ticker snapshot together with its pseudo-RSI bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
    /// The snapshot the bucket was derived from
    pub snapshot: TickerSnapshot,

    /// Bucket value in [15, 85]
    pub bucket: u8,
}

impl RsiReading {
    pub fn change_24h_percent(&self) -> f64 {
        self.snapshot.change_24h_percent
    }
}

/// Category of a trading signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Bucket at or below the oversold threshold
    Oversold,
    /// Bucket at or above the overbought threshold
    Overbought,
    /// 24h change at or below minus the strong-move threshold
    StrongDrop,
    /// 24h change at or above the strong-move threshold
    StrongRally,
    /// 24h volume above the high-volume threshold
    HighVolume,
}

impl SignalKind {
    /// Emoji tag shown in front of the signal text
    pub fn emoji(&self) -> &'static str {
        match self {
            SignalKind::Oversold | SignalKind::StrongDrop => "🟢",
            SignalKind::Overbought | SignalKind::StrongRally => "🔴",
            SignalKind::HighVolume => "📊",
        }
    }

    /// Short label, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Oversold => "oversold",
            SignalKind::Overbought => "overbought",
            SignalKind::StrongDrop => "strong drop",
            SignalKind::StrongRally => "strong rally",
            SignalKind::HighVolume => "high volume",
        }
    }
}

/// Immutable, human-readable trading signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub text: String,
}

impl Signal {
    /// Builds a signal, prefixing the text with the kind's emoji
    pub fn new(kind: SignalKind, text: impl AsRef<str>) -> Self {
        Self {
            kind,
            text: format!("{} {}", kind.emoji(), text.as_ref()),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
