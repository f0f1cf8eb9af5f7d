//! Binance 24h ticker provider implementation

use crate::{
    constants::{BINANCE_API_URL, BINANCE_TICKER_24HR_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::ProviderError,
    provider::MarketDataProvider,
    types::TickerSnapshot,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Binance API response for the 24h rolling ticker
///
/// Numeric fields arrive as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24hrResponse {
    last_price: String,
    price_change_percent: String,
    volume: String,
}

/// Binance public market data provider
pub struct BinanceProvider {
    client: Client,
    base_url: String,
}

impl BinanceProvider {
    /// Creates a provider against the public Binance API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(BINANCE_API_URL)
    }

    /// Creates a provider against a custom base URL (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self) -> String {
        format!("{}{}", self.base_url, BINANCE_TICKER_24HR_ENDPOINT)
    }

    /// Parses the raw ticker body into a snapshot
    fn parse_response(symbol: &str, body: &str) -> Result<TickerSnapshot, ProviderError> {
        let ticker: Ticker24hrResponse = serde_json::from_str(body).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Failed to parse Binance ticker for {}: {}. Response: {}",
                symbol, e, body
            ))
        })?;

        Ok(TickerSnapshot::new(
            symbol,
            parse_number("lastPrice", &ticker.last_price)?,
            parse_number("priceChangePercent", &ticker.price_change_percent)?,
            parse_number("volume", &ticker.volume)?,
        ))
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, ProviderError> {
    let value = raw.trim().parse::<f64>().map_err(|e| {
        ProviderError::InvalidResponse(format!("Field {} is not a number ({:?}): {}", field, raw, e))
    })?;

    if !value.is_finite() {
        return Err(ProviderError::InvalidResponse(format!(
            "Field {} is not finite: {:?}",
            field, raw
        )));
    }
    Ok(value)
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    async fn fetch_ticker(&self, symbol: &str) -> Result<TickerSnapshot, ProviderError> {
        let url = self.build_url();
        tracing::debug!(symbol, url = %url, "Fetching 24h ticker from Binance");

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded);
        }

        if status != StatusCode::OK {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response.text().await?;
        let snapshot = Self::parse_response(symbol, &body)?;

        tracing::debug!(
            symbol,
            price = snapshot.last_price,
            change_24h = snapshot.change_24h_percent,
            volume = snapshot.volume,
            "Fetched 24h ticker"
        );

        Ok(snapshot)
    }

    fn provider_name(&self) -> &'static str {
        "binance"
    }
}
