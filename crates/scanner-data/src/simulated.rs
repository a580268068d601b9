//! Simulated market data.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use scanner_core::error::DataError;
use scanner_core::traits::MarketDataSource;
use scanner_core::types::Candle;

const BAR_INTERVAL_MS: i64 = 5 * 60 * 1000;
const RETURN_SIGMA: f64 = 0.001;

fn symbol_seed(symbol: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    symbol.hash(&mut hasher);
    hasher.finish()
}

/// Deterministic per-symbol random walk.
///
/// Each symbol gets a base price of `1000 + hash(symbol) % 5000` and a
/// gaussian-return walk seeded from the symbol, so repeated fetches for
/// the same symbol produce the same price path. Bars are 5 minutes apart,
/// ending at the current time.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDataSource;

impl SimulatedDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MarketDataSource for SimulatedDataSource {
    async fn fetch_candles(&self, symbol: &str, count: usize) -> Result<Vec<Candle>, DataError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let seed = symbol_seed(symbol);
        let base_price = 1000.0 + (seed % 5000) as f64;
        let mut rng = StdRng::seed_from_u64(seed);
        let returns = Normal::new(0.0, RETURN_SIGMA)
            .map_err(|e| DataError::Unavailable(e.to_string()))?;

        let now = Utc::now().timestamp_millis();
        let start = now - (count as i64 - 1) * BAR_INTERVAL_MS;

        let mut candles = Vec::with_capacity(count);
        let mut price = base_price;

        for i in 0..count {
            let open = price;
            let close = open * (1.0 + returns.sample(&mut rng));
            let wick = returns.sample(&mut rng).abs();
            let high = open.max(close) * (1.0 + wick);
            let low = open.min(close) * (1.0 - wick);
            let volume = rng.gen_range(10_000.0..100_000.0_f64).round();

            candles.push(Candle::new(
                start + i as i64 * BAR_INTERVAL_MS,
                open,
                high,
                low,
                close,
                volume,
            ));
            price = close;
        }

        Ok(candles)
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_per_symbol() {
        let source = SimulatedDataSource::new();
        let first = source.fetch_candles("RELIANCE", 50).await.unwrap();
        let second = source.fetch_candles("RELIANCE", 50).await.unwrap();

        let closes_a: Vec<f64> = first.iter().map(|c| c.close).collect();
        let closes_b: Vec<f64> = second.iter().map(|c| c.close).collect();
        assert_eq!(closes_a, closes_b);
    }

    #[tokio::test]
    async fn test_symbols_diverge() {
        let source = SimulatedDataSource::new();
        let a = source.fetch_candles("RELIANCE", 10).await.unwrap();
        let b = source.fetch_candles("TCS", 10).await.unwrap();
        assert_ne!(a[0].open, b[0].open);
    }

    #[tokio::test]
    async fn test_base_price_in_range() {
        let source = SimulatedDataSource::new();
        for symbol in ["RELIANCE", "TCS", "INFY", "HDFCBANK"] {
            let candles = source.fetch_candles(symbol, 1).await.unwrap();
            assert!(candles[0].open >= 1000.0);
            assert!(candles[0].open < 6000.0);
        }
    }

    #[tokio::test]
    async fn test_bars_are_five_minutes_apart() {
        let source = SimulatedDataSource::new();
        let candles = source.fetch_candles("RELIANCE", 5).await.unwrap();
        for pair in candles.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 300_000);
        }
    }

    #[tokio::test]
    async fn test_candles_are_well_formed() {
        let source = SimulatedDataSource::new();
        let candles = source.fetch_candles("RELIANCE", 100).await.unwrap();
        assert_eq!(candles.len(), 100);
        for candle in &candles {
            assert!(candle.high >= candle.open.max(candle.close));
            assert!(candle.low <= candle.open.min(candle.close));
            assert!(candle.volume >= 10_000.0);
        }
    }

    #[tokio::test]
    async fn test_zero_count() {
        let source = SimulatedDataSource::new();
        let candles = source.fetch_candles("RELIANCE", 0).await.unwrap();
        assert!(candles.is_empty());
    }
}
