//! In-memory store implementations.
//!
//! The default backing for simulation runs and tests. A database-backed
//! store would implement the same two traits.

use async_trait::async_trait;
use tokio::sync::Mutex;

use scanner_core::error::PersistenceError;
use scanner_core::traits::{StrategyEntry, StrategyStore, TradeStore};
use scanner_core::types::{Position, Trade};

/// Strategy store serving a fixed list of enabled entries.
#[derive(Debug, Default)]
pub struct MemoryStrategyStore {
    entries: Vec<StrategyEntry>,
}

impl MemoryStrategyStore {
    pub fn new(entries: Vec<StrategyEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl StrategyStore for MemoryStrategyStore {
    async fn list_enabled(&self) -> Result<Vec<StrategyEntry>, PersistenceError> {
        Ok(self.entries.clone())
    }
}

/// Trade store keeping everything in memory.
#[derive(Debug, Default)]
pub struct MemoryTradeStore {
    trades: Mutex<Vec<Trade>>,
    positions: Mutex<Vec<Position>>,
}

impl MemoryTradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub async fn recorded(&self) -> Vec<Trade> {
        self.trades.lock().await.clone()
    }

    /// Preload open positions, as a persistent store would have them.
    pub async fn seed_positions(&self, positions: Vec<Position>) {
        *self.positions.lock().await = positions;
    }
}

#[async_trait]
impl TradeStore for MemoryTradeStore {
    async fn record_trade(&self, trade: &Trade) -> Result<(), PersistenceError> {
        self.trades.lock().await.push(trade.clone());
        Ok(())
    }

    async fn list_open_positions(&self) -> Result<Vec<Position>, PersistenceError> {
        Ok(self.positions.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use scanner_core::types::Side;

    #[tokio::test]
    async fn test_strategy_store_lists_entries() {
        let store = MemoryStrategyStore::new(vec![StrategyEntry {
            id: "sma-default".to_string(),
            voter_kind: "sma_crossover".to_string(),
            params: serde_json::json!({ "short_period": 10, "long_period": 30 }),
            weight: None,
        }]);

        let entries = store.list_enabled().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].voter_kind, "sma_crossover");
    }

    #[tokio::test]
    async fn test_trade_store_records_in_order() {
        let store = MemoryTradeStore::new();
        let first = Trade::executed("A", Side::Buy, dec!(1), dec!(100), None);
        let second = Trade::executed("B", Side::Sell, dec!(2), dec!(200), None);

        store.record_trade(&first).await.unwrap();
        store.record_trade(&second).await.unwrap();

        let recorded = store.recorded().await;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].symbol, "A");
        assert_eq!(recorded[1].symbol, "B");
    }
}
