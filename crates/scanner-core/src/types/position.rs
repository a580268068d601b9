//! Position and trade types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a position or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Sign used in pnl arithmetic (+1 long, -1 short).
    #[inline]
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => Decimal::NEGATIVE_ONE,
        }
    }

    /// The side that closes this position.
    #[inline]
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// An open position in a single symbol.
///
/// At most one open position per symbol; the ledger enforces this.
/// `trailing_peak` is mutated only by the money manager and advances
/// monotonically in the favorable direction, never resetting downward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Long or short
    pub side: Side,
    /// Entry price
    pub entry_price: Decimal,
    /// Number of shares
    pub quantity: Decimal,
    /// Hard stop-loss level
    pub stop_loss: Decimal,
    /// Take-profit level
    pub take_profit: Decimal,
    /// Best favorable price seen while the position has been profitable
    pub trailing_peak: Option<Decimal>,
    /// When the position was opened
    pub opened_at: DateTime<Utc>,
    /// Strategy that triggered the entry, if known
    pub strategy_id: Option<String>,
}

impl Position {
    /// Unrealized pnl at the given price.
    pub fn unrealized_pnl(&self, current_price: Decimal) -> Decimal {
        (current_price - self.entry_price) * self.quantity * self.side.sign()
    }

    /// Whether the given price is favorable relative to entry.
    pub fn is_profitable_at(&self, current_price: Decimal) -> bool {
        self.unrealized_pnl(current_price) > Decimal::ZERO
    }

    /// Advance the trailing peak if the price improved. Never retreats.
    pub fn update_trailing_peak(&mut self, current_price: Decimal) {
        if !self.is_profitable_at(current_price) && self.trailing_peak.is_none() {
            return;
        }
        let improved = match (self.side, self.trailing_peak) {
            (Side::Buy, Some(peak)) => current_price > peak,
            (Side::Sell, Some(peak)) => current_price < peak,
            (_, None) => true,
        };
        if improved {
            self.trailing_peak = Some(current_price);
        }
    }
}

/// Lifecycle status of a trade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Pending,
    Executed,
    Failed,
}

/// A recorded trade. Append-mostly; pnl is populated when the position closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Unique id
    pub id: Uuid,
    /// Symbol
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Number of shares
    pub quantity: Decimal,
    /// Execution price
    pub price: Decimal,
    /// Execution status
    pub status: TradeStatus,
    /// When the trade happened
    pub timestamp: DateTime<Utc>,
    /// Strategy that triggered the trade, if known
    pub strategy_id: Option<String>,
    /// Realized pnl; None until the position closes
    pub pnl: Option<Decimal>,
}

impl Trade {
    /// Create a new executed trade.
    pub fn executed(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        strategy_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            side,
            quantity,
            price,
            status: TradeStatus::Executed,
            timestamp: Utc::now(),
            strategy_id,
            pnl: None,
        }
    }

    /// Attach realized pnl to the trade.
    pub fn with_pnl(mut self, pnl: Decimal) -> Self {
        self.pnl = Some(pnl);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn long_position() -> Position {
        Position {
            symbol: "RELIANCE".to_string(),
            side: Side::Buy,
            entry_price: dec!(2450.50),
            quantity: dec!(10),
            stop_loss: dec!(2400.50),
            take_profit: dec!(2550.50),
            trailing_peak: None,
            opened_at: Utc::now(),
            strategy_id: None,
        }
    }

    #[test]
    fn test_unrealized_pnl_long() {
        let pos = long_position();
        assert_eq!(pos.unrealized_pnl(dec!(2460.50)), dec!(100.00));
        assert_eq!(pos.unrealized_pnl(dec!(2440.50)), dec!(-100.00));
    }

    #[test]
    fn test_unrealized_pnl_short() {
        let mut pos = long_position();
        pos.side = Side::Sell;
        assert_eq!(pos.unrealized_pnl(dec!(2440.50)), dec!(100.00));
    }

    #[test]
    fn test_trailing_peak_monotone() {
        let mut pos = long_position();

        // Not profitable yet, no peak
        pos.update_trailing_peak(dec!(2440));
        assert!(pos.trailing_peak.is_none());

        // Profitable: peak starts tracking
        pos.update_trailing_peak(dec!(2500));
        assert_eq!(pos.trailing_peak, Some(dec!(2500)));

        // Retrace never lowers the peak
        pos.update_trailing_peak(dec!(2475));
        assert_eq!(pos.trailing_peak, Some(dec!(2500)));

        // New high advances it
        pos.update_trailing_peak(dec!(2510));
        assert_eq!(pos.trailing_peak, Some(dec!(2510)));
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.sign(), Decimal::NEGATIVE_ONE);
    }
}
