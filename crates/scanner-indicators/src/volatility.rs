//! Volatility indicators.

use scanner_core::error::IndicatorError;
use serde::{Deserialize, Serialize};

/// Average True Range (ATR).
///
/// Measures market volatility by decomposing the entire range
/// of an asset price for that period. Used for position sizing
/// and exit distances.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Calculate ATR from OHLC data using Wilder's smoothing.
    pub fn calculate_ohlc(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Result<Vec<f64>, IndicatorError> {
        let len = high.len().min(low.len()).min(close.len());
        if len < self.period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: self.period + 1,
                available: len,
            });
        }

        // True range needs the previous close, so it starts at the second bar
        let mut tr = Vec::with_capacity(len - 1);

        for i in 1..len {
            let high_low = high[i] - low[i];
            let high_close = (high[i] - close[i - 1]).abs();
            let low_close = (low[i] - close[i - 1]).abs();
            tr.push(high_low.max(high_close).max(low_close));
        }

        let period_f64 = self.period as f64;
        let mut result = Vec::with_capacity(tr.len() - self.period + 1);

        // Initial ATR is the SMA of the first 'period' true ranges
        let mut atr: f64 = tr[..self.period].iter().sum::<f64>() / period_f64;
        result.push(atr);

        // Wilder's smoothing
        for &tr_val in &tr[self.period..] {
            atr = (atr * (period_f64 - 1.0) + tr_val) / period_f64;
            result.push(atr);
        }

        Ok(result)
    }

    /// Latest ATR value for the window.
    pub fn latest(&self, high: &[f64], low: &[f64], close: &[f64]) -> Result<f64, IndicatorError> {
        let values = self.calculate_ohlc(high, low, close)?;
        Ok(*values.last().expect("non-empty by construction"))
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
}

/// Bollinger Bands.
///
/// A middle band (SMA) with upper and lower bands at a specified
/// number of standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Calculate the band series over close prices.
    pub fn calculate(&self, data: &[f64]) -> Result<Vec<BollingerOutput>, IndicatorError> {
        if data.len() < self.period {
            return Err(IndicatorError::InsufficientData {
                required: self.period,
                available: data.len(),
            });
        }

        let period_f64 = self.period as f64;
        let mut result = Vec::with_capacity(data.len() - self.period + 1);

        for window in data.windows(self.period) {
            let mean: f64 = window.iter().sum::<f64>() / period_f64;
            let variance: f64 =
                window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
            let std_dev = variance.sqrt();

            result.push(BollingerOutput {
                upper: mean + self.std_dev_multiplier * std_dev,
                middle: mean,
                lower: mean - self.std_dev_multiplier * std_dev,
            });
        }

        Ok(result)
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atr_ohlc() {
        let atr = Atr::new(3);
        let high = vec![10.0, 11.0, 12.0, 11.0, 13.0, 14.0];
        let low = vec![8.0, 9.0, 10.0, 9.0, 11.0, 12.0];
        let close = vec![9.0, 10.0, 11.0, 10.0, 12.0, 13.0];

        let result = atr.calculate_ohlc(&high, &low, &close).unwrap();
        assert!(!result.is_empty());

        for value in &result {
            assert!(*value > 0.0);
        }
    }

    #[test]
    fn test_atr_insufficient() {
        let atr = Atr::new(14);
        let data = vec![1.0; 10];
        assert!(atr.calculate_ohlc(&data, &data, &data).is_err());
    }

    #[test]
    fn test_bollinger_ordering() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();

        let result = bb.calculate(&data).unwrap();
        assert!(!result.is_empty());

        for output in &result {
            assert!(output.upper > output.middle);
            assert!(output.middle > output.lower);
        }
    }

    #[test]
    fn test_bollinger_constant_price() {
        let bb = BollingerBands::with_params(5, 2.0);
        let data = vec![100.0; 5];

        let result = bb.calculate(&data).unwrap();
        assert_eq!(result.len(), 1);
        // Bands collapse onto the mean
        assert!((result[0].upper - 100.0).abs() < 1e-10);
        assert!((result[0].lower - 100.0).abs() < 1e-10);
    }
}
