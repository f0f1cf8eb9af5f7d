//! Provider abstraction for fetching 24h tickers from an exchange

use crate::{error::ProviderError, types::TickerSnapshot};
use async_trait::async_trait;

/// Trait for market data providers
///
/// One call per symbol per cycle. A failure means "no data this cycle" for
/// that symbol; callers do not retry within the same cycle.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the current 24h ticker for a single symbol
    ///
    /// # Arguments
    /// * `symbol` - Exchange symbol, e.g. `BTCUSDT`
    ///
    /// # Returns
    /// A fresh snapshot or an error if the request or parsing fails
    async fn fetch_ticker(&self, symbol: &str) -> Result<TickerSnapshot, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
