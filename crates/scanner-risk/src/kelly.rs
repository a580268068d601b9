//! Half-Kelly position sizing from realized trade history.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scanner_core::types::Trade;

/// Capital to risk per the half-Kelly criterion.
///
/// `capital * max((winRate * avgWin - lossRate * avgLoss) / avgWin, 0) / 2`
/// over closed trades. Returns None when no trade has realized pnl yet, so
/// callers can fall back to fixed-fraction sizing.
pub fn half_kelly_amount(capital: Decimal, history: &[Trade]) -> Option<Decimal> {
    let closed: Vec<Decimal> = history.iter().filter_map(|t| t.pnl).collect();
    if closed.is_empty() {
        return None;
    }

    let mut wins = Decimal::ZERO;
    let mut win_count = 0u32;
    let mut losses = Decimal::ZERO;
    let mut loss_count = 0u32;

    for pnl in &closed {
        if *pnl > Decimal::ZERO {
            wins += *pnl;
            win_count += 1;
        } else if *pnl < Decimal::ZERO {
            losses += pnl.abs();
            loss_count += 1;
        }
    }

    if win_count == 0 {
        return Some(Decimal::ZERO);
    }

    let total = Decimal::from(closed.len() as u32);
    let win_rate = Decimal::from(win_count) / total;
    let loss_rate = Decimal::ONE - win_rate;
    let avg_win = wins / Decimal::from(win_count);
    let avg_loss = if loss_count > 0 {
        losses / Decimal::from(loss_count)
    } else {
        Decimal::ZERO
    };

    let edge = (win_rate * avg_win - loss_rate * avg_loss) / avg_win;
    Some(capital * edge.max(Decimal::ZERO) / dec!(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanner_core::types::Side;

    fn closed_trade(pnl: Decimal) -> Trade {
        Trade::executed("TEST", Side::Sell, dec!(1), dec!(100), None).with_pnl(pnl)
    }

    #[test]
    fn test_no_history_gives_none() {
        assert!(half_kelly_amount(dec!(100000), &[]).is_none());

        // Open trades without pnl do not count as history
        let open = Trade::executed("TEST", Side::Buy, dec!(1), dec!(100), None);
        assert!(half_kelly_amount(dec!(100000), &[open]).is_none());
    }

    #[test]
    fn test_all_losses_give_zero() {
        let history = vec![closed_trade(dec!(-100)), closed_trade(dec!(-50))];
        assert_eq!(half_kelly_amount(dec!(100000), &history), Some(Decimal::ZERO));
    }

    #[test]
    fn test_positive_edge() {
        // 2 wins of 300, 1 loss of 150: winRate 2/3, avgWin 300, avgLoss 150
        // edge = (2/3 * 300 - 1/3 * 150) / 300 = 0.5; half = 0.25
        let history = vec![
            closed_trade(dec!(300)),
            closed_trade(dec!(300)),
            closed_trade(dec!(-150)),
        ];
        let amount = half_kelly_amount(dec!(100000), &history).unwrap();
        assert!((amount - dec!(25000)).abs() < dec!(0.01));
    }

    #[test]
    fn test_negative_edge_clamped_to_zero() {
        // 1 win of 50, 3 losses of 200: edge is negative
        let history = vec![
            closed_trade(dec!(50)),
            closed_trade(dec!(-200)),
            closed_trade(dec!(-200)),
            closed_trade(dec!(-200)),
        ];
        assert_eq!(half_kelly_amount(dec!(100000), &history), Some(Decimal::ZERO));
    }
}
