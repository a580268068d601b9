//! ATR-based position sizing and exit management.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use scanner_core::error::ScanError;
use scanner_core::types::{Position, RiskState, Side, Trade};

use crate::kelly::half_kelly_amount;

/// Money management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyConfig {
    /// Fraction of capital risked per trade
    pub risk_per_trade: Decimal,
    /// Stop distance as a multiple of ATR
    pub atr_stop_multiple: Decimal,
    /// Take-profit distance as a multiple of ATR
    pub atr_target_multiple: Decimal,
    /// Trailing stop retrace fraction from the favorable peak
    pub trailing_retrace: Decimal,
    /// Daily loss fraction of capital that halts new entries
    pub max_daily_loss: Decimal,
    /// Daily trade count that halts new entries
    pub max_daily_trades: u32,
    /// Size from the half-Kelly edge when trade history allows it
    pub use_kelly: bool,
}

impl Default for MoneyConfig {
    fn default() -> Self {
        Self {
            risk_per_trade: dec!(0.02),
            atr_stop_multiple: dec!(2),
            atr_target_multiple: dec!(4),
            trailing_retrace: dec!(0.01),
            max_daily_loss: dec!(0.05),
            max_daily_trades: 50,
            use_kelly: false,
        }
    }
}

/// A sized entry with its protective levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizedEntry {
    pub quantity: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
}

/// Why a position should be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    TrailingStop,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::TakeProfit => "take_profit",
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TrailingStop => "trailing_stop",
        }
    }
}

/// Sizes entries from capital and ATR, and decides exits.
#[derive(Debug, Clone)]
pub struct MoneyManager {
    config: MoneyConfig,
}

impl MoneyManager {
    pub fn new(config: MoneyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MoneyConfig {
        &self.config
    }

    /// Size an entry at `price` given the current ATR.
    ///
    /// Returns None when no affordable position exists: non-positive
    /// inputs, a risk budget smaller than the per-share stop distance,
    /// or a quantity that floors to zero after the capital cap.
    pub fn size_entry(
        &self,
        capital: Decimal,
        price: Decimal,
        atr: f64,
        side: Side,
        history: &[Trade],
    ) -> Option<SizedEntry> {
        let atr = Decimal::from_f64(atr)?;
        if price <= Decimal::ZERO || atr <= Decimal::ZERO || capital <= Decimal::ZERO {
            return None;
        }

        let stop_distance = atr * self.config.atr_stop_multiple;

        let mut risk_amount = capital * self.config.risk_per_trade;
        if self.config.use_kelly {
            if let Some(kelly) = half_kelly_amount(capital, history) {
                if kelly > Decimal::ZERO {
                    risk_amount = kelly;
                }
            }
        }

        // Cannot afford even one share at this stop distance
        if risk_amount < stop_distance {
            return None;
        }

        let quantity = (risk_amount / stop_distance)
            .floor()
            .min((capital / price).floor());
        if quantity < Decimal::ONE {
            return None;
        }

        let sign = side.sign();
        Some(SizedEntry {
            quantity,
            stop_loss: price - sign * stop_distance,
            take_profit: price + sign * atr * self.config.atr_target_multiple,
        })
    }

    /// Decide whether a position should exit at `price`.
    ///
    /// Checks run in a fixed order: take-profit, then hard stop, then the
    /// trailing stop. The trailing stop only fires once the position has
    /// been profitable and its peak has been recorded.
    pub fn check_exit(&self, position: &Position, price: Decimal) -> Option<ExitReason> {
        let sign = position.side.sign();

        if (price - position.take_profit) * sign >= Decimal::ZERO {
            return Some(ExitReason::TakeProfit);
        }
        if (position.stop_loss - price) * sign >= Decimal::ZERO {
            return Some(ExitReason::StopLoss);
        }
        if let Some(peak) = position.trailing_peak {
            let floor = peak * (Decimal::ONE - sign * self.config.trailing_retrace);
            if (floor - price) * sign >= Decimal::ZERO {
                return Some(ExitReason::TrailingStop);
            }
        }

        None
    }

    /// Check the daily risk gate before a new entry.
    pub fn check_daily_gate(&self, capital: Decimal, risk: &RiskState) -> Result<(), ScanError> {
        let loss_limit = capital * self.config.max_daily_loss;
        if risk.daily_loss_so_far >= loss_limit {
            return Err(ScanError::RiskLimitExceeded {
                reason: format!(
                    "daily loss {} reached limit {}",
                    risk.daily_loss_so_far, loss_limit
                ),
            });
        }
        if risk.trades_today >= self.config.max_daily_trades {
            return Err(ScanError::RiskLimitExceeded {
                reason: format!(
                    "daily trade count {} reached limit {}",
                    risk.trades_today, self.config.max_daily_trades
                ),
            });
        }
        Ok(())
    }
}

impl Default for MoneyManager {
    fn default() -> Self {
        Self::new(MoneyConfig::default())
    }
}
