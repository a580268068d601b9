//! Money management and risk accounting.
//!
//! Sizing, stop placement, trailing exits, and the daily risk gate all live
//! in the `MoneyManager`; derived portfolio metrics (win rate, drawdown,
//! Sharpe) are computed from the recorded trade history.

mod kelly;
mod metrics;
mod money_manager;

pub use kelly::half_kelly_amount;
pub use metrics::RiskMetrics;
pub use money_manager::{ExitReason, MoneyConfig, MoneyManager, SizedEntry};
