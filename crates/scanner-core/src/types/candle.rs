//! OHLCV candle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single OHLCV bar. Immutable once produced.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Candle {
    /// Create a new candle.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Calculate the bar's body size.
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Check if the candle is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the candle is bearish (close < open).
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }
}

/// Time-ordered candle window for one symbol, strictly increasing timestamps.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    /// Symbol identifier
    pub symbol: String,
    candles: VecDeque<Candle>,
    /// Maximum capacity (0 = unlimited)
    capacity: usize,
}

impl CandleSeries {
    /// Create a new empty series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            candles: VecDeque::new(),
            capacity: 0,
        }
    }

    /// Create a series with a maximum capacity.
    /// When capacity is reached, oldest candles are removed.
    pub fn with_capacity(symbol: impl Into<String>, capacity: usize) -> Self {
        Self {
            symbol: symbol.into(),
            candles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new candle, removing the oldest if at capacity.
    pub fn push(&mut self, candle: Candle) {
        if self.capacity > 0 && self.candles.len() >= self.capacity {
            self.candles.pop_front();
        }
        self.candles.push_back(candle);
    }

    /// Push multiple candles.
    pub fn extend(&mut self, candles: impl IntoIterator<Item = Candle>) {
        for candle in candles {
            self.push(candle);
        }
    }

    /// Get the number of candles.
    #[inline]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Get the last (most recent) candle.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }

    /// Get a candle by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Extract open prices as a vector.
    pub fn opens(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.open).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// Get an iterator over the candles.
    pub fn iter(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }
}

impl FromIterator<Candle> for CandleSeries {
    fn from_iter<T: IntoIterator<Item = Candle>>(iter: T) -> Self {
        let candles: VecDeque<Candle> = iter.into_iter().collect();
        Self {
            symbol: String::new(),
            candles,
            capacity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_calculations() {
        let candle = Candle::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        assert!((candle.typical_price() - 103.333333).abs() < 0.001);
        assert!((candle.range() - 15.0).abs() < 0.001);
        assert!((candle.body() - 5.0).abs() < 0.001);
        assert!(candle.is_bullish());
        assert!(!candle.is_bearish());
    }

    #[test]
    fn test_candle_true_range() {
        let candle = Candle::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        // Without previous close
        assert!((candle.true_range(None) - 15.0).abs() < 0.001);

        // With previous close that creates a gap
        assert!((candle.true_range(Some(90.0)) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_series_capacity() {
        let mut series = CandleSeries::with_capacity("RELIANCE", 3);

        series.push(Candle::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Candle::new(2, 100.5, 102.0, 100.0, 101.5, 1000.0));
        series.push(Candle::new(3, 101.5, 103.0, 101.0, 102.5, 1000.0));
        assert_eq!(series.len(), 3);

        // Oldest is evicted when at capacity
        series.push(Candle::new(4, 102.5, 104.0, 102.0, 103.5, 1000.0));
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0).unwrap().timestamp, 2);
    }

    #[test]
    fn test_series_extractions() {
        let mut series = CandleSeries::new("RELIANCE");
        series.push(Candle::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Candle::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0));

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![1000.0, 2000.0]);
    }
}
