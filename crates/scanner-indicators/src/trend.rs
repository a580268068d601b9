//! Trend indicators.

use crate::volatility::Atr;
use scanner_core::error::IndicatorError;
use serde::{Deserialize, Serialize};

/// SuperTrend output for one bar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuperTrendOutput {
    /// The SuperTrend line (lower band when bullish, upper band when bearish)
    pub line: f64,
    /// +1 bullish, -1 bearish
    pub direction: i8,
}

/// SuperTrend indicator.
///
/// ATR-offset bands around the bar midpoint; the direction flips when
/// the close breaks through the opposite band of the previous bar.
#[derive(Debug, Clone)]
pub struct SuperTrend {
    period: usize,
    multiplier: f64,
}

impl SuperTrend {
    /// Create a new SuperTrend with default parameters (10, 3.0).
    pub fn new() -> Self {
        Self::with_params(10, 3.0)
    }

    /// Create a SuperTrend with custom parameters.
    pub fn with_params(period: usize, multiplier: f64) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        assert!(multiplier > 0.0, "Multiplier must be positive");
        Self { period, multiplier }
    }

    /// Calculate from OHLC data. Output starts at bar index `period + 1`.
    pub fn calculate_ohlc(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Result<Vec<SuperTrendOutput>, IndicatorError> {
        let len = high.len().min(low.len()).min(close.len());
        // One extra bar so the first output can see the previous bar's bands
        let required = self.period + 2;
        if len < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: len,
            });
        }

        let atr = Atr::new(self.period).calculate_ohlc(high, low, close)?;

        // Band for bar i (i >= period) uses atr[i - period]
        let band = |i: usize| {
            let hl2 = (high[i] + low[i]) / 2.0;
            let offset = self.multiplier * atr[i - self.period];
            (hl2 + offset, hl2 - offset)
        };

        let mut result = Vec::with_capacity(len - self.period - 1);
        let mut direction: i8 = 1;

        for i in (self.period + 1)..len {
            let (prev_upper, prev_lower) = band(i - 1);
            if close[i] > prev_upper {
                direction = 1;
            } else if close[i] < prev_lower {
                direction = -1;
            }

            let (upper, lower) = band(i);
            let line = if direction == 1 { lower } else { upper };
            result.push(SuperTrendOutput { line, direction });
        }

        Ok(result)
    }
}

impl Default for SuperTrend {
    fn default() -> Self {
        Self::new()
    }
}

/// Average Directional Index (ADX).
///
/// Measures trend strength regardless of direction.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create a new ADX indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let period_f64 = period as f64;
        let mut result = Vec::with_capacity(values.len() - period + 1);

        let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
        result.push(avg);

        for &value in &values[period..] {
            avg = (avg * (period_f64 - 1.0) + value) / period_f64;
            result.push(avg);
        }

        result
    }

    /// Calculate the ADX series from OHLC data.
    pub fn calculate_ohlc(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Result<Vec<f64>, IndicatorError> {
        let len = high.len().min(low.len()).min(close.len());
        let required = 2 * self.period + 1;
        if len < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: len,
            });
        }

        let mut plus_dm = Vec::with_capacity(len - 1);
        let mut minus_dm = Vec::with_capacity(len - 1);
        let mut tr = Vec::with_capacity(len - 1);

        for i in 1..len {
            let up_move = high[i] - high[i - 1];
            let down_move = low[i - 1] - low[i];

            plus_dm.push(if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            });
            minus_dm.push(if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            });

            let high_low = high[i] - low[i];
            let high_close = (high[i] - close[i - 1]).abs();
            let low_close = (low[i] - close[i - 1]).abs();
            tr.push(high_low.max(high_close).max(low_close));
        }

        let smoothed_plus = Self::wilder_smooth(&plus_dm, self.period);
        let smoothed_minus = Self::wilder_smooth(&minus_dm, self.period);
        let smoothed_tr = Self::wilder_smooth(&tr, self.period);

        let dx: Vec<f64> = smoothed_plus
            .iter()
            .zip(smoothed_minus.iter())
            .zip(smoothed_tr.iter())
            .map(|((&p, &m), &t)| {
                if t == 0.0 {
                    return 0.0;
                }
                let plus_di = 100.0 * p / t;
                let minus_di = 100.0 * m / t;
                let di_sum = plus_di + minus_di;
                if di_sum == 0.0 {
                    0.0
                } else {
                    100.0 * (plus_di - minus_di).abs() / di_sum
                }
            })
            .collect();

        let adx = Self::wilder_smooth(&dx, self.period);
        if adx.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required,
                available: len,
            });
        }

        Ok(adx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supertrend_uptrend_bullish() {
        let st = SuperTrend::with_params(3, 2.0);
        let high: Vec<f64> = (0..20).map(|i| 102.0 + i as f64 * 2.0).collect();
        let low: Vec<f64> = (0..20).map(|i| 98.0 + i as f64 * 2.0).collect();
        let close: Vec<f64> = (0..20).map(|i| 100.0 + i as f64 * 2.0).collect();

        let result = st.calculate_ohlc(&high, &low, &close).unwrap();
        assert!(!result.is_empty());
        assert_eq!(result.last().unwrap().direction, 1);
    }

    #[test]
    fn test_supertrend_flip_on_reversal() {
        let st = SuperTrend::with_params(3, 1.0);
        // Strong uptrend followed by a sharp collapse
        let mut close: Vec<f64> = (0..12).map(|i| 100.0 + i as f64 * 3.0).collect();
        close.extend([120.0, 100.0, 80.0, 60.0]);
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();

        let result = st.calculate_ohlc(&high, &low, &close).unwrap();
        assert_eq!(result.last().unwrap().direction, -1);
        // There was a bullish stretch before the flip
        assert!(result.iter().any(|o| o.direction == 1));
    }

    #[test]
    fn test_supertrend_insufficient() {
        let st = SuperTrend::new();
        let data = vec![1.0; 8];
        assert!(st.calculate_ohlc(&data, &data, &data).is_err());
    }

    #[test]
    fn test_adx_bounds() {
        let adx = Adx::new(5);
        let high: Vec<f64> = (0..30).map(|i| 102.0 + (i as f64 * 0.7).sin() * 4.0).collect();
        let low: Vec<f64> = (0..30).map(|i| 98.0 + (i as f64 * 0.7).sin() * 4.0).collect();
        let close: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 4.0).collect();

        let result = adx.calculate_ohlc(&high, &low, &close).unwrap();
        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_adx_strong_trend() {
        let adx = Adx::new(5);
        let high: Vec<f64> = (0..40).map(|i| 102.0 + i as f64 * 2.0).collect();
        let low: Vec<f64> = (0..40).map(|i| 98.0 + i as f64 * 2.0).collect();
        let close: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 2.0).collect();

        let result = adx.calculate_ohlc(&high, &low, &close).unwrap();
        // A persistent one-way trend should read as strong
        assert!(*result.last().unwrap() > 25.0);
    }
}
