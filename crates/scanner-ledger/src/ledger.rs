//! The ledger proper.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::warn;

use scanner_core::error::{LedgerError, PersistenceError};
use scanner_core::traits::TradeStore;
use scanner_core::types::{Position, Trade, TradeStatus};

/// Result of closing a position.
#[derive(Debug, Clone)]
pub struct ClosedPosition {
    pub position: Position,
    pub trade: Trade,
    pub pnl: Decimal,
}

struct LedgerState {
    positions: HashMap<String, Position>,
    history: Vec<Trade>,
    // Trades whose store write failed, retried before the next write
    pending_writes: Vec<Trade>,
}

/// Owner of open positions and the trade history.
pub struct Ledger {
    state: Mutex<LedgerState>,
    trade_store: Arc<dyn TradeStore>,
}

impl Ledger {
    pub fn new(trade_store: Arc<dyn TradeStore>) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                positions: HashMap::new(),
                history: Vec::new(),
                pending_writes: Vec::new(),
            }),
            trade_store,
        }
    }

    /// Load open positions from the store, replacing the in-memory set.
    pub async fn restore(&self) -> Result<usize, PersistenceError> {
        let positions = self.trade_store.list_open_positions().await?;
        let mut state = self.state.lock().await;
        state.positions = positions
            .into_iter()
            .map(|p| (p.symbol.clone(), p))
            .collect();
        Ok(state.positions.len())
    }

    /// Open a position. Fails if the symbol already has one.
    pub async fn open_position(&self, position: Position) -> Result<Trade, LedgerError> {
        let mut state = self.state.lock().await;
        if state.positions.contains_key(&position.symbol) {
            return Err(LedgerError::AlreadyOpen(position.symbol));
        }

        let trade = Trade::executed(
            position.symbol.clone(),
            position.side,
            position.quantity,
            position.entry_price,
            position.strategy_id.clone(),
        );
        state.positions.insert(position.symbol.clone(), position);
        state.history.push(trade.clone());

        self.persist(&mut state, &trade).await;
        Ok(trade)
    }

    /// Close the open position in `symbol` at `exit_price`.
    ///
    /// Realized pnl is `(exit - entry) * quantity`, sign-adjusted for
    /// shorts. The closing trade is recorded with the pnl attached.
    pub async fn close_position(
        &self,
        symbol: &str,
        exit_price: Decimal,
    ) -> Result<ClosedPosition, LedgerError> {
        let mut state = self.state.lock().await;
        let position = state
            .positions
            .remove(symbol)
            .ok_or_else(|| LedgerError::NoOpenPosition(symbol.to_string()))?;

        let pnl = position.unrealized_pnl(exit_price);
        let trade = Trade::executed(
            symbol,
            position.side.opposite(),
            position.quantity,
            exit_price,
            position.strategy_id.clone(),
        )
        .with_pnl(pnl);
        state.history.push(trade.clone());

        self.persist(&mut state, &trade).await;
        Ok(ClosedPosition {
            position,
            trade,
            pnl,
        })
    }

    /// The open position for `symbol`, if any.
    pub async fn position(&self, symbol: &str) -> Option<Position> {
        self.state.lock().await.positions.get(symbol).cloned()
    }

    /// All open positions.
    pub async fn open_positions(&self) -> Vec<Position> {
        self.state.lock().await.positions.values().cloned().collect()
    }

    /// Number of open positions.
    pub async fn open_count(&self) -> usize {
        self.state.lock().await.positions.len()
    }

    /// Advance the trailing peak on an open position.
    pub async fn update_trailing_peak(&self, symbol: &str, price: Decimal) {
        let mut state = self.state.lock().await;
        if let Some(position) = state.positions.get_mut(symbol) {
            position.update_trailing_peak(price);
        }
    }

    /// The full trade history, oldest first.
    pub async fn history(&self) -> Vec<Trade> {
        self.state.lock().await.history.clone()
    }

    /// Sum of realized pnl over the whole history.
    pub async fn realized_pnl(&self) -> Decimal {
        self.state
            .lock()
            .await
            .history
            .iter()
            .filter_map(|t| t.pnl)
            .sum()
    }

    /// Write a trade through to the store, retrying earlier failures first.
    /// A failed write is queued and the in-memory state is kept as is.
    async fn persist(&self, state: &mut LedgerState, trade: &Trade) {
        let mut to_write = std::mem::take(&mut state.pending_writes);
        to_write.push(trade.clone());

        for trade in to_write {
            if let Err(err) = self.trade_store.record_trade(&trade).await {
                warn!(trade_id = %trade.id, error = %err, "trade store write failed, queued for retry");
                let mut failed = trade;
                failed.status = TradeStatus::Failed;
                state.pending_writes.push(failed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTradeStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use scanner_core::types::Side;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn long_position(symbol: &str) -> Position {
        Position {
            symbol: symbol.to_string(),
            side: Side::Buy,
            entry_price: dec!(2450.50),
            quantity: dec!(10),
            stop_loss: dec!(2400.50),
            take_profit: dec!(2550.50),
            trailing_peak: None,
            opened_at: Utc::now(),
            strategy_id: Some("sma_crossover".to_string()),
        }
    }

    fn ledger_with_store() -> (Ledger, Arc<MemoryTradeStore>) {
        let store = Arc::new(MemoryTradeStore::new());
        (Ledger::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_one_open_position_per_symbol() {
        let (ledger, _) = ledger_with_store();

        ledger.open_position(long_position("RELIANCE")).await.unwrap();
        let err = ledger
            .open_position(long_position("RELIANCE"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyOpen(s) if s == "RELIANCE"));

        // A different symbol is fine
        ledger.open_position(long_position("TCS")).await.unwrap();
        assert_eq!(ledger.open_count().await, 2);
    }

    #[tokio::test]
    async fn test_close_without_open_fails() {
        let (ledger, _) = ledger_with_store();
        let err = ledger.close_position("INFY", dec!(100)).await.unwrap_err();
        assert!(matches!(err, LedgerError::NoOpenPosition(s) if s == "INFY"));
    }

    #[tokio::test]
    async fn test_close_realizes_pnl() {
        let (ledger, _) = ledger_with_store();
        ledger.open_position(long_position("RELIANCE")).await.unwrap();

        let closed = ledger
            .close_position("RELIANCE", dec!(2470.50))
            .await
            .unwrap();
        assert_eq!(closed.pnl, dec!(200.00));
        assert_eq!(closed.trade.side, Side::Sell);
        assert_eq!(closed.trade.pnl, Some(dec!(200.00)));
        assert_eq!(ledger.open_count().await, 0);
        assert_eq!(ledger.realized_pnl().await, dec!(200.00));
    }

    #[tokio::test]
    async fn test_short_pnl_sign() {
        let (ledger, _) = ledger_with_store();
        let mut pos = long_position("RELIANCE");
        pos.side = Side::Sell;
        ledger.open_position(pos).await.unwrap();

        // Price fell 50: a short gains
        let closed = ledger
            .close_position("RELIANCE", dec!(2400.50))
            .await
            .unwrap();
        assert_eq!(closed.pnl, dec!(500.00));
        assert_eq!(closed.trade.side, Side::Buy);
    }

    #[tokio::test]
    async fn test_trades_written_through() {
        let (ledger, store) = ledger_with_store();
        ledger.open_position(long_position("RELIANCE")).await.unwrap();
        ledger
            .close_position("RELIANCE", dec!(2500))
            .await
            .unwrap();

        let recorded = store.recorded().await;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].side, Side::Buy);
        assert_eq!(recorded[1].pnl, Some(dec!(495.00)));
    }

    struct FlakyStore {
        failing: AtomicBool,
        inner: MemoryTradeStore,
    }

    #[async_trait]
    impl TradeStore for FlakyStore {
        async fn record_trade(&self, trade: &Trade) -> Result<(), PersistenceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PersistenceError::StoreUnreachable("down".to_string()));
            }
            self.inner.record_trade(trade).await
        }

        async fn list_open_positions(&self) -> Result<Vec<Position>, PersistenceError> {
            self.inner.list_open_positions().await
        }
    }

    #[tokio::test]
    async fn test_store_failure_does_not_block_and_retries() {
        let store = Arc::new(FlakyStore {
            failing: AtomicBool::new(true),
            inner: MemoryTradeStore::new(),
        });
        let ledger = Ledger::new(store.clone());

        // The open succeeds in memory even though the store is down
        ledger.open_position(long_position("RELIANCE")).await.unwrap();
        assert_eq!(ledger.open_count().await, 1);
        assert!(store.inner.recorded().await.is_empty());

        // Store recovers; the close flushes the queued write too
        store.failing.store(false, Ordering::SeqCst);
        ledger
            .close_position("RELIANCE", dec!(2500))
            .await
            .unwrap();

        let recorded = store.inner.recorded().await;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].status, TradeStatus::Failed);
        assert_eq!(recorded[1].status, TradeStatus::Executed);
    }

    #[tokio::test]
    async fn test_restore_loads_open_positions() {
        let store = Arc::new(MemoryTradeStore::new());
        store.seed_positions(vec![long_position("RELIANCE")]).await;

        let ledger = Ledger::new(store);
        let count = ledger.restore().await.unwrap();
        assert_eq!(count, 1);
        assert!(ledger.position("RELIANCE").await.is_some());
    }
}
