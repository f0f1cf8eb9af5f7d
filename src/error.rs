//! Error types for the momentum alert bot

use thiserror::Error;

/// Errors that can occur when fetching a ticker from the exchange
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    /// Invalid response from the exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Exchange answered with a non-200 status
    #[error("Provider API error: {0}")]
    ApiError(String),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkError(err)
        }
    }
}

/// Errors that can occur when delivering a chat message
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport-level failure, no HTTP status was received
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Messaging API answered with a non-200 status
    #[error("Message rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Errors raised while reading configuration at startup
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or blank
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is present but unusable
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Creates an Invalid error
    pub fn invalid(var: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the alert monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Startup connectivity probe failed
    #[error("Connectivity probe for {symbol} failed: {source}")]
    Probe {
        symbol: String,
        #[source]
        source: ProviderError,
    },

    /// No data for a symbol this cycle
    #[error("No data for {symbol}: {source}")]
    Fetch {
        symbol: String,
        #[source]
        source: ProviderError,
    },

    /// Exchange client could not be built
    #[error("Market data client setup failed: {0}")]
    ProviderSetup(#[source] ProviderError),

    /// Messaging client could not be built
    #[error("Messaging client setup failed: {0}")]
    NotifierSetup(#[source] NotifyError),
}
