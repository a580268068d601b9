//! The closed set of strategy voters.
//!
//! Every "crossing" condition compares the two most recent completed bars.
//! A voter returns Hold, never an error, when an indicator reports
//! insufficient data.

use scanner_core::types::{CandleSeries, Vote};
use scanner_indicators::{
    average_volume, BollingerBands, Ema, Macd, Rsi, Sma, Stochastic, SuperTrend, Vwap,
};
use serde::{Deserialize, Serialize};

/// Parameters for the SMA/EMA crossover voters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverParams {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            short_period: 20,
            long_period: 50,
        }
    }
}

/// Parameters for the RSI mean-reversion voter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiParams {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

/// Parameters for the MACD voter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Parameters for the Bollinger band voter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerParams {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

/// Parameters for the VWAP voter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VwapParams {
    pub volume_period: usize,
    pub volume_threshold: f64,
}

impl Default for VwapParams {
    fn default() -> Self {
        Self {
            volume_period: 20,
            volume_threshold: 1.5,
        }
    }
}

/// Parameters for the SuperTrend voter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperTrendParams {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for SuperTrendParams {
    fn default() -> Self {
        Self {
            period: 10,
            multiplier: 3.0,
        }
    }
}

/// Parameters for the combined Stochastic-RSI voter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StochRsiParams {
    pub rsi_period: usize,
    pub stoch_period: usize,
}

impl Default for StochRsiParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stoch_period: 14,
        }
    }
}

/// A strategy voter: one rule mapping recent candles to a vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum Voter {
    SmaCrossover(CrossoverParams),
    EmaCrossover(CrossoverParams),
    RsiReversion(RsiParams),
    MacdCross(MacdParams),
    BollingerReversion(BollingerParams),
    VwapCross(VwapParams),
    SuperTrendFlip(SuperTrendParams),
    StochRsi(StochRsiParams),
}

impl Voter {
    /// Stable key identifying the voter kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Voter::SmaCrossover(_) => "sma_crossover",
            Voter::EmaCrossover(_) => "ema_crossover",
            Voter::RsiReversion(_) => "rsi",
            Voter::MacdCross(_) => "macd",
            Voter::BollingerReversion(_) => "bollinger",
            Voter::VwapCross(_) => "vwap",
            Voter::SuperTrendFlip(_) => "supertrend",
            Voter::StochRsi(_) => "stoch_rsi",
        }
    }

    /// Fixed aggregation weight for this voter kind.
    pub fn default_weight(&self) -> f64 {
        match self {
            Voter::SmaCrossover(_) => 1.0,
            Voter::EmaCrossover(_) => 1.0,
            Voter::RsiReversion(_) => 0.8,
            Voter::MacdCross(_) => 1.0,
            Voter::BollingerReversion(_) => 0.7,
            Voter::VwapCross(_) => 0.9,
            Voter::SuperTrendFlip(_) => 1.2,
            Voter::StochRsi(_) => 0.8,
        }
    }

    /// Build a voter from a strategy-store kind and JSON params.
    /// Unparseable or missing params fall back to defaults.
    pub fn from_kind(kind: &str, params: &serde_json::Value) -> Option<Voter> {
        fn parse<T: serde::de::DeserializeOwned + Default>(value: &serde_json::Value) -> T {
            serde_json::from_value(value.clone()).unwrap_or_default()
        }

        match kind {
            "sma_crossover" => Some(Voter::SmaCrossover(parse(params))),
            "ema_crossover" => Some(Voter::EmaCrossover(parse(params))),
            "rsi" => Some(Voter::RsiReversion(parse(params))),
            "macd" => Some(Voter::MacdCross(parse(params))),
            "bollinger" => Some(Voter::BollingerReversion(parse(params))),
            "vwap" => Some(Voter::VwapCross(parse(params))),
            "supertrend" => Some(Voter::SuperTrendFlip(parse(params))),
            "stoch_rsi" => Some(Voter::StochRsi(parse(params))),
            _ => None,
        }
    }

    /// All voter kinds with default parameters.
    pub fn all_defaults() -> Vec<Voter> {
        vec![
            Voter::SmaCrossover(CrossoverParams::default()),
            Voter::EmaCrossover(CrossoverParams::default()),
            Voter::RsiReversion(RsiParams::default()),
            Voter::MacdCross(MacdParams::default()),
            Voter::BollingerReversion(BollingerParams::default()),
            Voter::VwapCross(VwapParams::default()),
            Voter::SuperTrendFlip(SuperTrendParams::default()),
            Voter::StochRsi(StochRsiParams::default()),
        ]
    }

    /// Evaluate the voter against a candle window.
    pub fn evaluate(&self, series: &CandleSeries) -> Vote {
        match self {
            Voter::SmaCrossover(p) => sma_crossover(series, p),
            Voter::EmaCrossover(p) => ema_crossover(series, p),
            Voter::RsiReversion(p) => rsi_reversion(series, p),
            Voter::MacdCross(p) => macd_cross(series, p),
            Voter::BollingerReversion(p) => bollinger_reversion(series, p),
            Voter::VwapCross(p) => vwap_cross(series, p),
            Voter::SuperTrendFlip(p) => supertrend_flip(series, p),
            Voter::StochRsi(p) => stoch_rsi(series, p),
        }
    }
}

/// Last two values of a series, if it has at least two.
fn last_two(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    Some((values[values.len() - 2], values[values.len() - 1]))
}

fn ma_crossover(short: &[f64], long: &[f64]) -> Vote {
    let (Some((prev_s, curr_s)), Some((prev_l, curr_l))) = (last_two(short), last_two(long))
    else {
        return Vote::Hold;
    };

    // Golden cross: short crosses above long
    if prev_s <= prev_l && curr_s > curr_l {
        Vote::Buy
    // Death cross: short crosses below long
    } else if prev_s >= prev_l && curr_s < curr_l {
        Vote::Sell
    } else {
        Vote::Hold
    }
}

fn sma_crossover(series: &CandleSeries, params: &CrossoverParams) -> Vote {
    let closes = series.closes();
    let (Ok(short), Ok(long)) = (
        Sma::new(params.short_period).calculate(&closes),
        Sma::new(params.long_period).calculate(&closes),
    ) else {
        return Vote::Hold;
    };
    ma_crossover(&short, &long)
}

fn ema_crossover(series: &CandleSeries, params: &CrossoverParams) -> Vote {
    let closes = series.closes();
    let (Ok(short), Ok(long)) = (
        Ema::new(params.short_period).calculate(&closes),
        Ema::new(params.long_period).calculate(&closes),
    ) else {
        return Vote::Hold;
    };
    ma_crossover(&short, &long)
}

fn rsi_reversion(series: &CandleSeries, params: &RsiParams) -> Vote {
    let closes = series.closes();
    let Ok(rsi) = Rsi::new(params.period).calculate(&closes) else {
        return Vote::Hold;
    };
    let Some((prev, curr)) = last_two(&rsi) else {
        return Vote::Hold;
    };

    if prev >= params.oversold && curr < params.oversold {
        Vote::Buy
    } else if prev <= params.overbought && curr > params.overbought {
        Vote::Sell
    } else {
        Vote::Hold
    }
}

fn macd_cross(series: &CandleSeries, params: &MacdParams) -> Vote {
    let closes = series.closes();
    let Ok(outputs) = Macd::with_periods(params.fast, params.slow, params.signal).calculate(&closes)
    else {
        return Vote::Hold;
    };
    if outputs.len() < 2 {
        return Vote::Hold;
    }
    let prev = outputs[outputs.len() - 2];
    let curr = outputs[outputs.len() - 1];

    if prev.macd <= prev.signal && curr.macd > curr.signal {
        Vote::Buy
    } else if prev.macd >= prev.signal && curr.macd < curr.signal {
        Vote::Sell
    } else {
        Vote::Hold
    }
}

fn bollinger_reversion(series: &CandleSeries, params: &BollingerParams) -> Vote {
    let closes = series.closes();
    let Ok(bands) = BollingerBands::with_params(params.period, params.std_dev).calculate(&closes)
    else {
        return Vote::Hold;
    };
    if bands.len() < 2 || closes.len() < 2 {
        return Vote::Hold;
    }
    let prev_band = bands[bands.len() - 2];
    let curr_band = bands[bands.len() - 1];
    let (prev_close, curr_close) = (closes[closes.len() - 2], closes[closes.len() - 1]);

    // Close crosses below the lower band: oversold reversion entry
    if prev_close >= prev_band.lower && curr_close < curr_band.lower {
        Vote::Buy
    // Close crosses above the upper band
    } else if prev_close <= prev_band.upper && curr_close > curr_band.upper {
        Vote::Sell
    } else {
        Vote::Hold
    }
}

fn vwap_cross(series: &CandleSeries, params: &VwapParams) -> Vote {
    let highs = series.highs();
    let lows = series.lows();
    let closes = series.closes();
    let volumes = series.volumes();

    let Ok(vwap) = Vwap::new().calculate_ohlcv(&highs, &lows, &closes, &volumes) else {
        return Vote::Hold;
    };
    let (Some((prev_v, curr_v)), Some((prev_c, curr_c))) = (last_two(&vwap), last_two(&closes))
    else {
        return Vote::Hold;
    };
    let Ok(avg_volume) = average_volume(&volumes, params.volume_period) else {
        return Vote::Hold;
    };

    // Volume gate applies to the entry side only
    let volume_confirmed = volumes.last().copied().unwrap_or(0.0)
        >= avg_volume.last().copied().unwrap_or(f64::INFINITY) * params.volume_threshold;

    if prev_c <= prev_v && curr_c > curr_v && volume_confirmed {
        Vote::Buy
    } else if prev_c >= prev_v && curr_c < curr_v {
        Vote::Sell
    } else {
        Vote::Hold
    }
}

fn supertrend_flip(series: &CandleSeries, params: &SuperTrendParams) -> Vote {
    let highs = series.highs();
    let lows = series.lows();
    let closes = series.closes();

    let Ok(outputs) = SuperTrend::with_params(params.period, params.multiplier)
        .calculate_ohlc(&highs, &lows, &closes)
    else {
        return Vote::Hold;
    };
    if outputs.len() < 2 {
        return Vote::Hold;
    }
    let prev = outputs[outputs.len() - 2].direction;
    let curr = outputs[outputs.len() - 1].direction;

    match (prev, curr) {
        (-1, 1) => Vote::Buy,
        (1, -1) => Vote::Sell,
        _ => Vote::Hold,
    }
}

fn stoch_rsi(series: &CandleSeries, params: &StochRsiParams) -> Vote {
    let highs = series.highs();
    let lows = series.lows();
    let closes = series.closes();

    let Ok(rsi) = Rsi::new(params.rsi_period).calculate(&closes) else {
        return Vote::Hold;
    };
    let Ok(stoch) = Stochastic::with_periods(params.stoch_period, 3)
        .calculate_ohlc(&highs, &lows, &closes)
    else {
        return Vote::Hold;
    };
    let (Some(&rsi_now), Some(stoch_now)) = (rsi.last(), stoch.last()) else {
        return Vote::Hold;
    };

    // Both oscillators must agree before this voter speaks
    if rsi_now < 30.0 && stoch_now.k < 20.0 {
        Vote::Buy
    } else if rsi_now > 70.0 && stoch_now.k > 80.0 {
        Vote::Sell
    } else {
        Vote::Hold
    }
}
