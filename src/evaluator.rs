//! Signal evaluation on top of the 24h ticker
//!
//! The "RSI" here is a coarse step function over the 24h percent change,
//! not a relative-strength index computed from a price series:
//!
//! | 24h change `c`   | bucket |
//! |------------------|--------|
//! | c <= -10         | 15     |
//! | -10 < c <= -5    | 25     |
//! | -5 < c <= -2     | 35     |
//! | -2 < c < 2       | 50     |
//! | 2 <= c < 5       | 65     |
//! | 5 <= c < 10      | 75     |
//! | c >= 10          | 85     |

use crate::{
    constants::{HIGH_VOLUME_THRESHOLD, RSI_OVERBOUGHT, RSI_OVERSOLD, STRONG_MOVE_PERCENT},
    types::{RsiReading, Signal, SignalKind, TickerSnapshot},
};

/// Maps a 24h percent change onto its pseudo-RSI bucket
///
/// Total over `f64`: NaN matches no threshold and lands in the neutral bucket.
pub fn rsi_bucket(change_24h_percent: f64) -> u8 {
    let c = change_24h_percent;
    if c <= -10.0 {
        15
    } else if c <= -5.0 {
        25
    } else if c <= -2.0 {
        35
    } else if c >= 10.0 {
        85
    } else if c >= 5.0 {
        75
    } else if c >= 2.0 {
        65
    } else {
        50
    }
}

/// Turns snapshots into readings and readings into signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalEvaluator {
    oversold: u8,
    overbought: u8,
}

impl Default for SignalEvaluator {
    fn default() -> Self {
        Self::new(RSI_OVERSOLD, RSI_OVERBOUGHT)
    }
}

impl SignalEvaluator {
    pub fn new(oversold: u8, overbought: u8) -> Self {
        Self {
            oversold,
            overbought,
        }
    }

    pub fn oversold(&self) -> u8 {
        self.oversold
    }

    pub fn overbought(&self) -> u8 {
        self.overbought
    }

    /// Attaches the bucket to a snapshot
    pub fn evaluate(&self, snapshot: TickerSnapshot) -> RsiReading {
        let bucket = rsi_bucket(snapshot.change_24h_percent);
        RsiReading { snapshot, bucket }
    }

    /// Applies every threshold rule independently; an empty list is the normal case
    pub fn signals(&self, reading: &RsiReading) -> Vec<Signal> {
        let mut signals = Vec::new();
        let bucket = reading.bucket;
        let change = reading.change_24h_percent();

        if bucket <= self.oversold {
            signals.push(Signal::new(
                SignalKind::Oversold,
                format!("RSI Oversold ({}) - Possible buy", bucket),
            ));
        }
        if bucket >= self.overbought {
            signals.push(Signal::new(
                SignalKind::Overbought,
                format!("RSI Overbought ({}) - Possible sell", bucket),
            ));
        }

        if change <= -STRONG_MOVE_PERCENT {
            signals.push(Signal::new(
                SignalKind::StrongDrop,
                format!("Strong drop (-{:.1}%) - Buying opportunity", change.abs()),
            ));
        } else if change >= STRONG_MOVE_PERCENT {
            signals.push(Signal::new(
                SignalKind::StrongRally,
                format!("Strong rally (+{:.1}%) - Consider selling", change),
            ));
        }

        if reading.snapshot.volume > HIGH_VOLUME_THRESHOLD {
            signals.push(Signal::new(
                SignalKind::HighVolume,
                "High volume - Market interest",
            ));
        }

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(signals: &[Signal]) -> Vec<SignalKind> {
        signals.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_bucket_table() {
        let cases = [
            (-50.0, 15),
            (-10.0, 15),
            (-9.99, 25),
            (-5.0, 25),
            (-4.99, 35),
            (-2.0, 35),
            (-1.99, 50),
            (0.0, 50),
            (1.99, 50),
            (2.0, 65),
            (4.99, 65),
            (5.0, 75),
            (9.99, 75),
            (10.0, 85),
            (250.0, 85),
        ];
        for (change, expected) in cases {
            assert_eq!(rsi_bucket(change), expected, "change {}", change);
        }
    }

    #[test]
    fn test_bucket_is_deterministic_and_bounded() {
        let mut c = -30.0;
        while c <= 30.0 {
            let bucket = rsi_bucket(c);
            assert_eq!(bucket, rsi_bucket(c));
            assert!((15..=85).contains(&bucket));
            c += 0.25;
        }
        assert_eq!(rsi_bucket(f64::NAN), 50);
    }

    #[test]
    fn test_strong_drop_is_oversold_and_strong_drop() {
        let evaluator = SignalEvaluator::default();
        let reading = evaluator.evaluate(TickerSnapshot::new("BTCUSDT", 40_000.0, -12.0, 50.0));

        assert_eq!(reading.bucket, 15);
        let signals = evaluator.signals(&reading);
        assert_eq!(
            kinds(&signals),
            vec![SignalKind::Oversold, SignalKind::StrongDrop]
        );
        assert_eq!(signals[0].text, "🟢 RSI Oversold (15) - Possible buy");
        assert_eq!(signals[1].text, "🟢 Strong drop (-12.0%) - Buying opportunity");
    }

    #[test]
    fn test_flat_market_emits_nothing() {
        let evaluator = SignalEvaluator::default();
        let reading = evaluator.evaluate(TickerSnapshot::new("BTCUSDT", 40_000.0, 0.0, 50.0));

        assert_eq!(reading.bucket, 50);
        assert!(evaluator.signals(&reading).is_empty());
    }

    #[test]
    fn test_rally_with_volume_emits_three_signals() {
        let evaluator = SignalEvaluator::default();
        let reading =
            evaluator.evaluate(TickerSnapshot::new("ETHUSDT", 3_532.45, 11.0, 150_000.0));

        assert_eq!(reading.bucket, 85);
        let signals = evaluator.signals(&reading);
        assert_eq!(
            kinds(&signals),
            vec![
                SignalKind::Overbought,
                SignalKind::StrongRally,
                SignalKind::HighVolume
            ]
        );
        assert_eq!(signals[1].text, "🔴 Strong rally (+11.0%) - Consider selling");
    }

    #[test]
    fn test_volume_threshold_is_exclusive() {
        let evaluator = SignalEvaluator::default();
        let at = evaluator.evaluate(TickerSnapshot::new("BNBUSDT", 600.0, 0.5, 100_000.0));
        let above = evaluator.evaluate(TickerSnapshot::new("BNBUSDT", 600.0, 0.5, 100_000.5));

        assert!(evaluator.signals(&at).is_empty());
        assert_eq!(kinds(&evaluator.signals(&above)), vec![SignalKind::HighVolume]);
    }

    #[test]
    fn test_custom_thresholds() {
        let evaluator = SignalEvaluator::new(35, 65);
        let dip = evaluator.evaluate(TickerSnapshot::new("SOLUSDT", 150.0, -3.0, 10.0));
        let pop = evaluator.evaluate(TickerSnapshot::new("SOLUSDT", 150.0, 3.0, 10.0));

        assert_eq!(kinds(&evaluator.signals(&dip)), vec![SignalKind::Oversold]);
        assert_eq!(kinds(&evaluator.signals(&pop)), vec![SignalKind::Overbought]);
    }
}
