//! Constants for the momentum alert bot
//!
//! Fixed cadence, thresholds and endpoints live here. The few values that
//! can be overridden at startup (pairs, interval, RSI limits, base URLs) are
//! read by `config` and fall back to the defaults below.

/// How often a full monitoring cycle starts (in seconds)
pub const CHECK_INTERVAL_SECS: u64 = 300;

/// Minimum time between two alerts for the same symbol (in seconds)
pub const ALERT_COOLDOWN_SECS: i64 = 1800;

/// Pause between two symbols inside a cycle (in seconds)
pub const SYMBOL_PAUSE_SECS: u64 = 2;

/// Backoff after a cycle fails outright (in seconds)
pub const ERROR_BACKOFF_SECS: u64 = 60;

/// HTTP request timeout for both the exchange and the messaging API (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default oversold threshold on the pseudo-RSI bucket
pub const RSI_OVERSOLD: u8 = 30;

/// Default overbought threshold on the pseudo-RSI bucket
pub const RSI_OVERBOUGHT: u8 = 70;

/// Absolute 24h change (in percent) that counts as a strong move
pub const STRONG_MOVE_PERCENT: f64 = 10.0;

/// 24h volume (base-asset units) above which a pair is flagged as busy
pub const HIGH_VOLUME_THRESHOLD: f64 = 100_000.0;

/// Number of fetch samples kept for latency percentiles
pub const METRICS_WINDOW: usize = 100;

/// Pairs monitored when `ALERT_SYMBOLS` is not set
pub const DEFAULT_SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "ADAUSDT"];

/// Quote asset stripped when rendering a pair as `BASE/QUOTE`
pub const QUOTE_ASSET: &str = "USDT";

/// Binance public REST base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Binance 24h rolling ticker endpoint
pub const BINANCE_TICKER_24HR_ENDPOINT: &str = "/ticker/24hr";

/// Binance web trade page, used for deep links in alerts
pub const BINANCE_TRADE_URL: &str = "https://www.binance.com/en/trade";

/// Telegram Bot API base URL
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Telegram parse mode used for formatted alerts
pub const TELEGRAM_PARSE_MODE: &str = "Markdown";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "momentum-alert-bot/0.1.0";
