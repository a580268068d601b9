//! Risk metrics derived from the recorded trade history.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use scanner_core::types::Trade;

/// Aggregate performance metrics over closed trades.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RiskMetrics {
    /// Number of closed trades
    pub total_trades: usize,
    /// Winning fraction of closed trades
    pub win_rate: f64,
    /// Gross profit / gross loss
    pub profit_factor: f64,
    /// Largest peak-to-trough equity decline, as a fraction of the peak
    pub max_drawdown: f64,
    /// Annualized Sharpe ratio over per-trade equity returns
    pub sharpe_ratio: f64,
}

impl RiskMetrics {
    /// Compute metrics from the trade history.
    ///
    /// Only trades carrying realized pnl participate. The equity curve is
    /// reconstructed by applying each pnl to `initial_capital` in recorded
    /// order.
    pub fn compute(initial_capital: Decimal, history: &[Trade]) -> RiskMetrics {
        let pnls: Vec<Decimal> = history.iter().filter_map(|t| t.pnl).collect();
        if pnls.is_empty() {
            return RiskMetrics::default();
        }

        let wins = pnls.iter().filter(|p| **p > Decimal::ZERO).count();
        let gross_profit: f64 = pnls
            .iter()
            .filter(|p| **p > Decimal::ZERO)
            .filter_map(|p| p.to_f64())
            .sum();
        let gross_loss: f64 = pnls
            .iter()
            .filter(|p| **p < Decimal::ZERO)
            .filter_map(|p| p.abs().to_f64())
            .sum();

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        // Equity curve and per-trade returns
        let initial = initial_capital.to_f64().unwrap_or(0.0);
        let mut equity = initial;
        let mut peak = initial;
        let mut max_drawdown: f64 = 0.0;
        let mut returns = Vec::with_capacity(pnls.len());

        for pnl in &pnls {
            let prev = equity;
            equity += pnl.to_f64().unwrap_or(0.0);
            if prev > 0.0 {
                returns.push((equity - prev) / prev);
            }
            if equity > peak {
                peak = equity;
            }
            if peak > 0.0 {
                max_drawdown = max_drawdown.max((peak - equity) / peak);
            }
        }

        let sharpe_ratio = if returns.len() > 1 {
            let mean = returns.iter().mean();
            let std_dev = returns.iter().std_dev();
            if std_dev > 0.0 {
                mean / std_dev * 252.0_f64.sqrt()
            } else {
                0.0
            }
        } else {
            0.0
        };

        RiskMetrics {
            total_trades: pnls.len(),
            win_rate: wins as f64 / pnls.len() as f64,
            profit_factor,
            max_drawdown,
            sharpe_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use scanner_core::types::Side;

    fn closed_trade(pnl: Decimal) -> Trade {
        Trade::executed("TEST", Side::Sell, dec!(1), dec!(100), None).with_pnl(pnl)
    }

    #[test]
    fn test_empty_history() {
        let metrics = RiskMetrics::compute(dec!(100000), &[]);
        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.win_rate, 0.0);
    }

    #[test]
    fn test_win_rate_and_profit_factor() {
        let history = vec![
            closed_trade(dec!(200)),
            closed_trade(dec!(300)),
            closed_trade(dec!(-100)),
            closed_trade(dec!(-150)),
        ];
        let metrics = RiskMetrics::compute(dec!(100000), &history);

        assert_eq!(metrics.total_trades, 4);
        assert!((metrics.win_rate - 0.5).abs() < 1e-10);
        assert!((metrics.profit_factor - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_max_drawdown() {
        // Equity: 100000 -> 110000 -> 99000 -> 104000; trough is 10% off the peak
        let history = vec![
            closed_trade(dec!(10000)),
            closed_trade(dec!(-11000)),
            closed_trade(dec!(5000)),
        ];
        let metrics = RiskMetrics::compute(dec!(100000), &history);
        assert!((metrics.max_drawdown - 0.1).abs() < 1e-10);
    }

    #[test]
    fn test_profit_factor_without_losses() {
        let history = vec![closed_trade(dec!(100))];
        let metrics = RiskMetrics::compute(dec!(100000), &history);
        assert!(metrics.profit_factor.is_infinite());
    }

    #[test]
    fn test_sharpe_sign_follows_returns() {
        let winners: Vec<Trade> = vec![
            closed_trade(dec!(500)),
            closed_trade(dec!(700)),
            closed_trade(dec!(600)),
        ];
        let metrics = RiskMetrics::compute(dec!(100000), &winners);
        assert!(metrics.sharpe_ratio > 0.0);

        let losers: Vec<Trade> = vec![
            closed_trade(dec!(-500)),
            closed_trade(dec!(-700)),
            closed_trade(dec!(-600)),
        ];
        let metrics = RiskMetrics::compute(dec!(100000), &losers);
        assert!(metrics.sharpe_ratio < 0.0);
    }
}
