//! Engine state snapshot and daily risk counters.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether the engine trades against a live brokerage or generated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    #[default]
    Simulation,
    Live,
}

/// Read-only view of the engine for status queries.
///
/// Mutated only by the orchestrator; reset when the engine is restarted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Whether the scan loop is running
    pub running: bool,
    /// Simulation or live
    pub mode: EngineMode,
    /// Completed scan cycles since start
    pub scan_count: u64,
    /// Current capital
    pub capital: Decimal,
    /// Realized pnl for the current trading day
    pub daily_pnl: Decimal,
    /// Number of open positions
    pub open_positions: usize,
    /// When the last scan completed
    pub last_scan_at: Option<DateTime<Utc>>,
}

impl EngineSnapshot {
    /// Fresh snapshot for a newly started engine.
    pub fn new(mode: EngineMode, capital: Decimal) -> Self {
        Self {
            running: false,
            mode,
            scan_count: 0,
            capital,
            daily_pnl: Decimal::ZERO,
            open_positions: 0,
            last_scan_at: None,
        }
    }
}

/// Daily risk counters gating new position opens.
///
/// Reset when the trading day rolls over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskState {
    /// Cumulative realized loss today (positive number = loss)
    pub daily_loss_so_far: Decimal,
    /// Trades opened today
    pub trades_today: u32,
    /// The day these counters apply to
    pub day_start: NaiveDate,
}

impl RiskState {
    /// Counters for the given day.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            daily_loss_so_far: Decimal::ZERO,
            trades_today: 0,
            day_start: day,
        }
    }

    /// Reset counters if `today` is past the tracked day.
    pub fn roll_over_if_needed(&mut self, today: NaiveDate) {
        if today > self.day_start {
            *self = RiskState::new(today);
        }
    }

    /// Fold a realized pnl into the daily loss counter.
    pub fn record_pnl(&mut self, pnl: Decimal) {
        if pnl < Decimal::ZERO {
            self.daily_loss_so_far += -pnl;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_risk_state_rollover() {
        let day1 = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

        let mut state = RiskState::new(day1);
        state.trades_today = 12;
        state.record_pnl(dec!(-500));
        assert_eq!(state.daily_loss_so_far, dec!(500));

        // Same day: nothing happens
        state.roll_over_if_needed(day1);
        assert_eq!(state.trades_today, 12);

        // Next day: counters reset
        state.roll_over_if_needed(day2);
        assert_eq!(state.trades_today, 0);
        assert_eq!(state.daily_loss_so_far, Decimal::ZERO);
        assert_eq!(state.day_start, day2);
    }

    #[test]
    fn test_record_pnl_ignores_gains() {
        let mut state = RiskState::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        state.record_pnl(dec!(300));
        assert_eq!(state.daily_loss_so_far, Decimal::ZERO);
    }
}
