//! Market data source trait.

use crate::error::DataError;
use crate::types::Candle;
use async_trait::async_trait;

/// Source of OHLCV candle windows per symbol.
///
/// Implementations are polymorphic over live and simulated data. A fetch
/// failure is non-fatal; the engine skips the symbol for that tick and
/// retries on the next one.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the most recent `count` candles for a symbol,
    /// ordered oldest to newest.
    async fn fetch_candles(&self, symbol: &str, count: usize) -> Result<Vec<Candle>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
