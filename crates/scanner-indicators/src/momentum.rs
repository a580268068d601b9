//! Momentum indicators.

use scanner_core::error::IndicatorError;
use serde::{Deserialize, Serialize};

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Wilder's smoothing: avg = (prev_avg * (period-1) + value) / period.
    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let mut result = Vec::with_capacity(values.len() - period + 1);
        let period_f64 = period as f64;

        let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
        result.push(avg);

        for &value in &values[period..] {
            avg = (avg * (period_f64 - 1.0) + value) / period_f64;
            result.push(avg);
        }

        result
    }

    /// Calculate the RSI series over close prices.
    pub fn calculate(&self, data: &[f64]) -> Result<Vec<f64>, IndicatorError> {
        if data.len() <= self.period {
            return Err(IndicatorError::InsufficientData {
                required: self.period + 1,
                available: data.len(),
            });
        }

        let mut gains = Vec::with_capacity(data.len() - 1);
        let mut losses = Vec::with_capacity(data.len() - 1);

        for i in 1..data.len() {
            let change = data[i] - data[i - 1];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let avg_gains = Self::wilder_smooth(&gains, self.period);
        let avg_losses = Self::wilder_smooth(&losses, self.period);

        Ok(avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| {
                if loss == 0.0 {
                    100.0
                } else {
                    100.0 - (100.0 / (1.0 + gain / loss))
                }
            })
            .collect())
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }

    fn calculate_ema(data: &[f64], period: usize) -> Vec<f64> {
        if data.len() < period {
            return vec![];
        }

        let multiplier = 2.0 / (period as f64 + 1.0);
        let mut result = Vec::with_capacity(data.len() - period + 1);

        let sma: f64 = data[..period].iter().sum::<f64>() / period as f64;
        result.push(sma);

        let mut ema = sma;
        for &price in &data[period..] {
            ema = price * multiplier + ema * (1.0 - multiplier);
            result.push(ema);
        }

        result
    }

    /// Calculate the MACD series over close prices.
    pub fn calculate(&self, data: &[f64]) -> Result<Vec<MacdOutput>, IndicatorError> {
        let required = self.slow_period + self.signal_period;
        if data.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: data.len(),
            });
        }

        let fast_ema = Self::calculate_ema(data, self.fast_period);
        let slow_ema = Self::calculate_ema(data, self.slow_period);

        // Align the EMAs (fast has more values)
        let offset = self.slow_period - self.fast_period;
        let fast_ema = &fast_ema[offset..];

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        if macd_line.len() < self.signal_period {
            return Err(IndicatorError::InsufficientData {
                required,
                available: data.len(),
            });
        }

        let signal_line = Self::calculate_ema(&macd_line, self.signal_period);

        let offset = self.signal_period - 1;
        Ok(macd_line[offset..]
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect())
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (fast stochastic)
    pub k: f64,
    /// %D (signal, SMA of %K)
    pub d: f64,
}

/// Stochastic oscillator.
///
/// Compares closing price to the price range over a period.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (14, 3).
    pub fn new() -> Self {
        Self::with_periods(14, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(k_period: usize, d_period: usize) -> Self {
        assert!(k_period > 0 && d_period > 0);
        Self { k_period, d_period }
    }

    /// Calculate from OHLC data.
    pub fn calculate_ohlc(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Result<Vec<StochasticOutput>, IndicatorError> {
        let len = high.len().min(low.len()).min(close.len());
        let required = self.k_period + self.d_period - 1;
        if len < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: len,
            });
        }

        // Raw %K values
        let mut k_values = Vec::with_capacity(len - self.k_period + 1);

        for i in (self.k_period - 1)..len {
            let start = i + 1 - self.k_period;
            let highest = high[start..=i]
                .iter()
                .cloned()
                .fold(f64::NEG_INFINITY, f64::max);
            let lowest = low[start..=i].iter().cloned().fold(f64::INFINITY, f64::min);

            let range = highest - lowest;
            let k = if range == 0.0 {
                50.0 // Undefined, use midpoint
            } else {
                ((close[i] - lowest) / range) * 100.0
            };
            k_values.push(k);
        }

        // %D is the SMA of %K
        let mut result = Vec::with_capacity(k_values.len() - self.d_period + 1);
        let d_period_f64 = self.d_period as f64;

        for i in (self.d_period - 1)..k_values.len() {
            let k = k_values[i];
            let d: f64 = k_values[(i + 1 - self.d_period)..=i].iter().sum::<f64>() / d_period_f64;
            result.push(StochasticOutput { k, d });
        }

        Ok(result)
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

/// Williams %R.
///
/// Measures where the close sits within the trailing high-low range,
/// on a scale of 0 (at the high) to -100 (at the low).
#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
}

impl WilliamsR {
    /// Create a new Williams %R indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Calculate from OHLC data.
    pub fn calculate_ohlc(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Result<Vec<f64>, IndicatorError> {
        let len = high.len().min(low.len()).min(close.len());
        if len < self.period {
            return Err(IndicatorError::InsufficientData {
                required: self.period,
                available: len,
            });
        }

        let mut result = Vec::with_capacity(len - self.period + 1);

        for i in (self.period - 1)..len {
            let start = i + 1 - self.period;
            let highest = high[start..=i]
                .iter()
                .cloned()
                .fold(f64::NEG_INFINITY, f64::max);
            let lowest = low[start..=i].iter().cloned().fold(f64::INFINITY, f64::min);

            let range = highest - lowest;
            let r = if range == 0.0 {
                -50.0
            } else {
                -100.0 * (highest - close[i]) / range
            };
            result.push(r);
        }

        Ok(result)
    }
}
