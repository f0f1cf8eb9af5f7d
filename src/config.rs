//! Startup configuration loaded from environment variables
//!
//! Credentials are mandatory; everything else falls back to `constants`.

use crate::{
    constants::{
        BINANCE_API_URL, CHECK_INTERVAL_SECS, DEFAULT_SYMBOLS, RSI_OVERBOUGHT, RSI_OVERSOLD,
        TELEGRAM_API_URL,
    },
    error::ConfigError,
};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const CHAT_ID_VAR: &str = "CHAT_ID";
pub const SYMBOLS_VAR: &str = "ALERT_SYMBOLS";
pub const CHECK_INTERVAL_VAR: &str = "CHECK_INTERVAL_SECS";
pub const RSI_OVERSOLD_VAR: &str = "RSI_OVERSOLD";
pub const RSI_OVERBOUGHT_VAR: &str = "RSI_OVERBOUGHT";
pub const BINANCE_API_URL_VAR: &str = "BINANCE_API_URL";
pub const TELEGRAM_API_URL_VAR: &str = "TELEGRAM_API_URL";

/// Immutable process configuration
#[derive(Clone)]
pub struct Config {
    /// Telegram bot token
    pub telegram_token: String,
    /// Destination chat identifier
    pub chat_id: String,
    /// Exchange symbols checked every cycle, in order
    pub symbols: Vec<String>,
    /// Target period between cycle starts
    pub check_interval: Duration,
    /// Bucket at or below which a pair is oversold
    pub rsi_oversold: u8,
    /// Bucket at or above which a pair is overbought
    pub rsi_overbought: u8,
    /// Exchange REST base URL
    pub exchange_base_url: String,
    /// Telegram Bot API base URL
    pub telegram_base_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("symbols", &self.symbols)
            .field("check_interval", &self.check_interval)
            .field("rsi_oversold", &self.rsi_oversold)
            .field("rsi_overbought", &self.rsi_overbought)
            .field("exchange_base_url", &self.exchange_base_url)
            .field("telegram_base_url", &self.telegram_base_url)
            .finish()
    }
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_token = required(&lookup, TELEGRAM_TOKEN_VAR)?;
        let chat_id = required(&lookup, CHAT_ID_VAR)?;

        let symbols = match optional(&lookup, SYMBOLS_VAR) {
            Some(raw) => parse_symbols(&raw)?,
            None => DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        };

        let interval_secs: u64 = parsed_or(&lookup, CHECK_INTERVAL_VAR, CHECK_INTERVAL_SECS)?;
        if interval_secs == 0 {
            return Err(ConfigError::invalid(
                CHECK_INTERVAL_VAR,
                "0",
                "interval must be positive",
            ));
        }

        let rsi_oversold: u8 = parsed_or(&lookup, RSI_OVERSOLD_VAR, RSI_OVERSOLD)?;
        let rsi_overbought: u8 = parsed_or(&lookup, RSI_OVERBOUGHT_VAR, RSI_OVERBOUGHT)?;
        for (var, value) in [
            (RSI_OVERSOLD_VAR, rsi_oversold),
            (RSI_OVERBOUGHT_VAR, rsi_overbought),
        ] {
            if value > 100 {
                return Err(ConfigError::invalid(
                    var,
                    value.to_string(),
                    "threshold must be within 0..=100",
                ));
            }
        }
        if rsi_oversold >= rsi_overbought {
            return Err(ConfigError::invalid(
                RSI_OVERBOUGHT_VAR,
                rsi_overbought.to_string(),
                format!("must be greater than {} ({})", RSI_OVERSOLD_VAR, rsi_oversold),
            ));
        }

        Ok(Self {
            telegram_token,
            chat_id,
            symbols,
            check_interval: Duration::from_secs(interval_secs),
            rsi_oversold,
            rsi_overbought,
            exchange_base_url: optional(&lookup, BINANCE_API_URL_VAR)
                .unwrap_or_else(|| BINANCE_API_URL.to_string()),
            telegram_base_url: optional(&lookup, TELEGRAM_API_URL_VAR)
                .unwrap_or_else(|| TELEGRAM_API_URL.to_string()),
        })
    }
}

/// Trimmed value, with blank treated as absent
fn optional<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, var).ok_or(ConfigError::Missing(var))
}

fn parsed_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match optional(lookup, var) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::invalid(var, raw.clone(), e.to_string())),
        None => Ok(default),
    }
}

fn parse_symbols(raw: &str) -> Result<Vec<String>, ConfigError> {
    let symbols: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(ConfigError::invalid(
            SYMBOLS_VAR,
            raw,
            "at least one symbol is required",
        ));
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_only_credentials_are_set() {
        let config = load(&[(TELEGRAM_TOKEN_VAR, "123:abc"), (CHAT_ID_VAR, "42")]).unwrap();

        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.chat_id, "42");
        assert_eq!(
            config.symbols,
            vec!["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "ADAUSDT"]
        );
        assert_eq!(config.check_interval, Duration::from_secs(300));
        assert_eq!(config.rsi_oversold, 30);
        assert_eq!(config.rsi_overbought, 70);
        assert_eq!(config.exchange_base_url, BINANCE_API_URL);
        assert_eq!(config.telegram_base_url, TELEGRAM_API_URL);
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        assert_eq!(
            load(&[(CHAT_ID_VAR, "42")]).unwrap_err(),
            ConfigError::Missing(TELEGRAM_TOKEN_VAR)
        );
        assert_eq!(
            load(&[(TELEGRAM_TOKEN_VAR, "123:abc"), (CHAT_ID_VAR, "  ")]).unwrap_err(),
            ConfigError::Missing(CHAT_ID_VAR)
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (TELEGRAM_TOKEN_VAR, "t"),
            (CHAT_ID_VAR, "c"),
            (SYMBOLS_VAR, " btcusdt, ,xrpusdt "),
            (CHECK_INTERVAL_VAR, "60"),
            (RSI_OVERSOLD_VAR, "25"),
            (RSI_OVERBOUGHT_VAR, "75"),
            (BINANCE_API_URL_VAR, "http://127.0.0.1:9000/api/v3"),
        ])
        .unwrap();

        assert_eq!(config.symbols, vec!["BTCUSDT", "XRPUSDT"]);
        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(config.rsi_oversold, 25);
        assert_eq!(config.rsi_overbought, 75);
        assert_eq!(config.exchange_base_url, "http://127.0.0.1:9000/api/v3");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let base = [(TELEGRAM_TOKEN_VAR, "t"), (CHAT_ID_VAR, "c")];

        let mut vars = base.to_vec();
        vars.push((CHECK_INTERVAL_VAR, "soon"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { var: CHECK_INTERVAL_VAR, .. })
        ));

        let mut vars = base.to_vec();
        vars.push((CHECK_INTERVAL_VAR, "0"));
        assert!(load(&vars).is_err());

        let mut vars = base.to_vec();
        vars.push((SYMBOLS_VAR, " , "));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { var: SYMBOLS_VAR, .. })
        ));

        let mut vars = base.to_vec();
        vars.push((RSI_OVERSOLD_VAR, "80"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { var: RSI_OVERBOUGHT_VAR, .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[(TELEGRAM_TOKEN_VAR, "secret-token"), (CHAT_ID_VAR, "42")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
