//! Volume indicators.

use scanner_core::error::IndicatorError;

/// Volume Weighted Average Price (VWAP), session-cumulative.
///
/// The running volume-weighted mean of the typical price over the
/// provided window, treated as one session.
#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    /// Create a new VWAP indicator.
    pub fn new() -> Self {
        Self
    }

    /// Calculate the cumulative VWAP series from OHLCV data.
    pub fn calculate_ohlcv(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        volume: &[f64],
    ) -> Result<Vec<f64>, IndicatorError> {
        let len = high.len().min(low.len()).min(close.len()).min(volume.len());
        if len == 0 {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        let mut result = Vec::with_capacity(len);
        let mut cum_pv = 0.0;
        let mut cum_vol = 0.0;

        for i in 0..len {
            let typical = (high[i] + low[i] + close[i]) / 3.0;
            cum_pv += typical * volume[i];
            cum_vol += volume[i];
            // Zero cumulative volume falls back to the typical price
            result.push(if cum_vol == 0.0 { typical } else { cum_pv / cum_vol });
        }

        Ok(result)
    }
}

/// Trailing average volume over the last `period` bars, one value per bar
/// once the window fills.
pub fn average_volume(volume: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    if volume.len() < period {
        return Err(IndicatorError::InsufficientData {
            required: period,
            available: volume.len(),
        });
    }

    let period_f64 = period as f64;
    let mut result = Vec::with_capacity(volume.len() - period + 1);
    let mut sum: f64 = volume[..period].iter().sum();
    result.push(sum / period_f64);

    for i in period..volume.len() {
        sum = sum - volume[i - period] + volume[i];
        result.push(sum / period_f64);
    }

    Ok(result)
}
