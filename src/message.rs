//! Chat message formatting
//!
//! Messages use Telegram's legacy Markdown (`*bold*`, `[text](url)`), which
//! `strip_markup` removes again for the plain-text fallback.

use crate::{
    constants::BINANCE_TRADE_URL,
    types::{display_pair, RsiReading, Signal},
};
use chrono::{DateTime, TimeZone};
use num_format::{Locale, ToFormattedString};
use std::fmt;
use std::time::Duration;

/// Sent once when the bot stops
pub const SHUTDOWN_MESSAGE: &str = "🛑 Bot stopped.";

/// Formats a price with thousands separators, e.g. `43,251.1200`
pub fn format_price(price: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, price.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| int_part.to_string());

    let sign = if price < 0.0 { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Builds the alert for one reading and its signals
pub fn format_alert<Tz>(reading: &RsiReading, signals: &[Signal], at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let snapshot = &reading.snapshot;
    let mut lines = vec![
        format!("🚨 *ALERT - {}* 🚨", snapshot.display_pair()),
        String::new(),
        format!("💰 *Price:* ${}", format_price(snapshot.last_price, 4)),
        format!("📈 *24h:* {:+.2}%", snapshot.change_24h_percent),
        format!("📊 *RSI:* {}", reading.bucket),
    ];

    if !signals.is_empty() {
        lines.push(String::new());
        lines.push("🎯 *Signals:*".to_string());
        lines.extend(signals.iter().map(|signal| format!("• {}", signal)));
    }

    lines.push(String::new());
    lines.push(format!("🔗 [Binance]({}/{})", BINANCE_TRADE_URL, snapshot.symbol));
    lines.push(format!("⏰ {}", at.format("%d/%m %H:%M")));

    lines.join("\n")
}

/// Builds the one-off startup notice
pub fn format_startup(
    symbols: &[String],
    interval: Duration,
    oversold: u8,
    overbought: u8,
) -> String {
    let pairs = symbols
        .chunks(2)
        .map(|chunk| {
            let names: Vec<String> = chunk.iter().map(|s| display_pair(s)).collect();
            format!("• {}", names.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🤖 *Momentum Alert Bot Started*\n\n\
         📊 *Monitoring:* {} pairs\n\
         ⏱️ *Interval:* {}s\n\
         📈 *RSI Limits:* {}-{}\n\n\
         🎯 *Pairs:*\n\
         {}\n\n\
         Bot active! 🚀",
        symbols.len(),
        interval.as_secs(),
        oversold,
        overbought,
        pairs
    )
}

/// Removes the Markdown emphasis characters
pub fn strip_markup(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '_')).collect()
}
