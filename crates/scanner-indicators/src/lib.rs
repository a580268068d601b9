//! Technical indicators.
//!
//! Pure, deterministic transforms over candle sequences:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD, Stochastic, Williams %R)
//! - Volatility indicators (ATR, Bollinger Bands)
//! - Trend indicators (ADX, SuperTrend)
//! - Volume indicators (VWAP)
//! - Candlestick pattern flags
//!
//! All computations are defined on the trailing window ending at the latest
//! candle; there is no lookahead. Inputs shorter than the lookback fail with
//! `IndicatorError::InsufficientData`, which callers treat as Hold.

pub mod momentum;
pub mod moving_average;
pub mod pattern;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::{Macd, MacdOutput, Rsi, Stochastic, StochasticOutput, WilliamsR};
pub use moving_average::{Ema, Sma};
pub use pattern::PatternFlags;
pub use trend::{Adx, SuperTrend, SuperTrendOutput};
pub use volatility::{Atr, BollingerBands, BollingerOutput};
pub use volume::{average_volume, Vwap};
