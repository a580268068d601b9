//! Candlestick pattern flags.

use scanner_core::error::IndicatorError;
use scanner_core::types::Candle;
use serde::{Deserialize, Serialize};

/// Pattern flags detected on the most recent bars.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PatternFlags {
    /// Open and close nearly equal relative to the bar range
    pub doji: bool,
    /// Small body at the top of a long lower shadow
    pub hammer: bool,
    /// Current bullish body engulfs the prior bearish body
    pub bullish_engulfing: bool,
    /// Current bearish body engulfs the prior bullish body
    pub bearish_engulfing: bool,
}

impl PatternFlags {
    /// Detect patterns on the last two candles of the window.
    pub fn detect(candles: &[Candle]) -> Result<PatternFlags, IndicatorError> {
        if candles.len() < 2 {
            return Err(IndicatorError::InsufficientData {
                required: 2,
                available: candles.len(),
            });
        }

        let prev = &candles[candles.len() - 2];
        let curr = &candles[candles.len() - 1];
        let range = curr.range();

        let doji = range > 0.0 && curr.body() <= range * 0.1;

        let lower_shadow = curr.open.min(curr.close) - curr.low;
        let upper_shadow = curr.high - curr.open.max(curr.close);
        let hammer = range > 0.0
            && curr.body() <= range * 0.3
            && lower_shadow >= curr.body() * 2.0
            && upper_shadow <= curr.body();

        let bullish_engulfing = prev.is_bearish()
            && curr.is_bullish()
            && curr.open <= prev.close
            && curr.close >= prev.open;

        let bearish_engulfing = prev.is_bullish()
            && curr.is_bearish()
            && curr.open >= prev.close
            && curr.close <= prev.open;

        Ok(PatternFlags {
            doji,
            hammer,
            bullish_engulfing,
            bearish_engulfing,
        })
    }
}
