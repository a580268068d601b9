//! The engine orchestrator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use scanner_core::error::{ScanError, ScanResult};
use scanner_core::traits::{MarketDataSource, StrategyStore, TradeStore};
use scanner_core::types::{
    CandleSeries, Decision, EngineMode, EngineSnapshot, Position, RiskState, Side, Vote,
    WeightedSignal,
};
use scanner_indicators::Atr;
use scanner_ledger::Ledger;
use scanner_risk::{MoneyManager, RiskMetrics};
use scanner_voters::{AggregateOutcome, Aggregator, EnabledVoter};

use crate::market_hours;
use crate::signal_log::SignalLog;

const ATR_PERIOD: usize = 14;

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Symbol universe scanned each tick
    pub symbols: Vec<String>,
    /// Starting capital
    pub initial_capital: Decimal,
    /// Candle window fetched per symbol
    pub candle_count: usize,
    /// Tick interval during market hours
    pub active_scan_interval: Duration,
    /// Tick interval while the market is closed
    pub closed_check_interval: Duration,
    /// Signal ring buffer capacity
    pub signal_log_capacity: usize,
    /// Simulation or live
    pub mode: EngineMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            symbols: vec!["RELIANCE".to_string(), "TCS".to_string()],
            initial_capital: dec!(100000),
            candle_count: 100,
            active_scan_interval: Duration::from_secs(5),
            closed_check_interval: Duration::from_secs(60),
            signal_log_capacity: 500,
            mode: EngineMode::Simulation,
        }
    }
}

struct RunningLoop {
    stop_tx: watch::Sender<bool>,
    handle: tokio::task::JoinHandle<()>,
}

struct EngineInner {
    config: EngineConfig,
    data: Arc<dyn MarketDataSource>,
    strategies: Arc<dyn StrategyStore>,
    ledger: Ledger,
    money: MoneyManager,
    aggregator: Aggregator,
    voters: Mutex<Vec<EnabledVoter>>,
    snapshot: Mutex<EngineSnapshot>,
    risk_state: Mutex<RiskState>,
    signals: Mutex<SignalLog>,
    last_prices: Mutex<HashMap<String, Decimal>>,
    last_errors: Mutex<HashMap<String, String>>,
}

/// The scan engine.
///
/// `start` spawns one background task driving the loop; `stop` signals it
/// through a watch channel, waits for it to finish, and closes every open
/// position at its last fetched price. Starting resets the snapshot;
/// ledger state survives restarts.
pub struct Engine {
    inner: Arc<EngineInner>,
    control: Mutex<Option<RunningLoop>>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        data: Arc<dyn MarketDataSource>,
        strategies: Arc<dyn StrategyStore>,
        trade_store: Arc<dyn TradeStore>,
        money: MoneyManager,
    ) -> Self {
        let snapshot = EngineSnapshot::new(config.mode, config.initial_capital);
        let signal_capacity = config.signal_log_capacity;
        Self {
            inner: Arc::new(EngineInner {
                config,
                data,
                strategies,
                ledger: Ledger::new(trade_store),
                money,
                aggregator: Aggregator::new(),
                voters: Mutex::new(Vec::new()),
                snapshot: Mutex::new(snapshot),
                risk_state: Mutex::new(RiskState::new(Utc::now().date_naive())),
                signals: Mutex::new(SignalLog::new(signal_capacity)),
                last_prices: Mutex::new(HashMap::new()),
                last_errors: Mutex::new(HashMap::new()),
            }),
            control: Mutex::new(None),
        }
    }

    /// Reload enabled voters from the strategy store.
    ///
    /// An empty store falls back to the full default panel. An unreachable
    /// store is an error; entries naming unknown voter kinds are skipped.
    pub async fn reload_strategies(&self) -> ScanResult<usize> {
        self.inner.reload_voters().await
    }

    /// Start the scan loop. Idempotent.
    pub async fn start(&self) -> ScanResult<()> {
        let mut control = self.control.lock().await;
        if control.is_some() {
            debug!("engine already running");
            return Ok(());
        }
        if self.inner.config.symbols.is_empty() {
            return Err(ScanError::Config("symbol universe is empty".to_string()));
        }

        let voter_count = self.reload_strategies().await?;

        match self.inner.ledger.restore().await {
            Ok(n) if n > 0 => info!(positions = n, "restored open positions from store"),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "could not restore open positions"),
        }

        {
            let mut snapshot = self.inner.snapshot.lock().await;
            *snapshot =
                EngineSnapshot::new(self.inner.config.mode, self.inner.config.initial_capital);
            snapshot.running = true;
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            inner.run_loop(stop_rx).await;
        });
        *control = Some(RunningLoop { stop_tx, handle });

        info!(
            mode = ?self.inner.config.mode,
            symbols = self.inner.config.symbols.len(),
            voters = voter_count,
            source = self.inner.data.name(),
            "engine started"
        );
        Ok(())
    }

    /// Stop the scan loop and close every open position at its last
    /// fetched price. No-op when already stopped.
    pub async fn stop(&self) {
        let running = self.control.lock().await.take();
        let Some(running) = running else {
            return;
        };

        let _ = running.stop_tx.send(true);
        if let Err(err) = running.handle.await {
            error!(error = %err, "scan loop task failed");
        }

        self.inner.close_all_positions().await;

        let open_positions = self.inner.ledger.open_count().await;
        let mut snapshot = self.inner.snapshot.lock().await;
        snapshot.running = false;
        snapshot.open_positions = open_positions;
        info!("engine stopped");
    }

    /// Run exactly one scan tick, regardless of market hours.
    pub async fn tick_once(&self) {
        self.inner.tick().await;
    }

    pub async fn is_running(&self) -> bool {
        self.control.lock().await.is_some()
    }

    pub async fn snapshot(&self) -> EngineSnapshot {
        self.inner.snapshot.lock().await.clone()
    }

    /// The most recent signals, newest last.
    pub async fn recent_signals(&self, count: usize) -> Vec<WeightedSignal> {
        self.inner.signals.lock().await.recent(count)
    }

    /// Risk metrics over the recorded trade history.
    pub async fn metrics(&self) -> RiskMetrics {
        let history = self.inner.ledger.history().await;
        RiskMetrics::compute(self.inner.config.initial_capital, &history)
    }

    pub async fn open_positions(&self) -> Vec<Position> {
        self.inner.ledger.open_positions().await
    }

    /// Last scan error per symbol, cleared on the next clean scan.
    pub async fn last_errors(&self) -> HashMap<String, String> {
        self.inner.last_errors.lock().await.clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }
}

impl EngineInner {
    async fn reload_voters(&self) -> ScanResult<usize> {
        let entries = self.strategies.list_enabled().await?;
        let mut voters = Vec::with_capacity(entries.len());
        for entry in entries {
            match EnabledVoter::from_entry(&entry) {
                Some(voter) => voters.push(voter),
                None => warn!(id = %entry.id, kind = %entry.voter_kind, "unknown voter kind, skipping"),
            }
        }
        if voters.is_empty() {
            debug!("strategy store has no usable entries, using the default panel");
            voters = EnabledVoter::default_panel();
        }
        let count = voters.len();
        *self.voters.lock().await = voters;
        Ok(count)
    }

    async fn run_loop(self: Arc<Self>, mut stop_rx: watch::Receiver<bool>) {
        loop {
            if *stop_rx.borrow() {
                break;
            }

            let interval = if market_hours::is_market_open() {
                self.tick().await;
                self.config.active_scan_interval
            } else {
                debug!("market closed, idle");
                self.config.closed_check_interval
            };

            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    /// One scan cycle over the whole symbol universe.
    ///
    /// The strategy store is consulted once per tick, so enabling or
    /// disabling a strategy takes effect on the next scan. A store failure
    /// keeps the previously loaded panel.
    async fn tick(self: &Arc<Self>) {
        self.risk_state
            .lock()
            .await
            .roll_over_if_needed(Utc::now().date_naive());

        if let Err(err) = self.reload_voters().await {
            warn!(error = %err, "strategy reload failed, keeping cached panel");
        }

        let voters = self.voters.lock().await.clone();
        let mut tasks = JoinSet::new();
        for symbol in self.config.symbols.clone() {
            let inner = self.clone();
            let voters = voters.clone();
            tasks.spawn(async move {
                let result = inner.scan_symbol(&symbol, &voters).await;
                (symbol, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((symbol, Ok(()))) => {
                    self.last_errors.lock().await.remove(&symbol);
                }
                Ok((symbol, Err(err))) => {
                    warn!(symbol = %symbol, error = %err, "symbol scan failed");
                    self.last_errors.lock().await.insert(symbol, err.to_string());
                }
                Err(err) => error!(error = %err, "symbol scan task panicked"),
            }
        }

        let history = self.ledger.history().await;
        let capital =
            self.config.initial_capital + history.iter().filter_map(|t| t.pnl).sum::<Decimal>();
        let today = Utc::now().date_naive();
        let daily_pnl: Decimal = history
            .iter()
            .filter(|t| t.timestamp.date_naive() == today)
            .filter_map(|t| t.pnl)
            .sum();
        let open_positions = self.ledger.open_count().await;
        let metrics = RiskMetrics::compute(self.config.initial_capital, &history);

        let mut snapshot = self.snapshot.lock().await;
        snapshot.scan_count += 1;
        snapshot.capital = capital;
        snapshot.daily_pnl = daily_pnl;
        snapshot.open_positions = open_positions;
        snapshot.last_scan_at = Some(Utc::now());

        info!(
            scan = snapshot.scan_count,
            capital = %capital,
            daily_pnl = %daily_pnl,
            open_positions,
            win_rate = metrics.win_rate,
            "scan complete"
        );
    }

    /// Scan one symbol. Exit evaluation runs first; a symbol never closes
    /// a position and opens a new one within the same tick. Every scanned
    /// symbol appends exactly one signal recording what the engine did.
    async fn scan_symbol(&self, symbol: &str, voters: &[EnabledVoter]) -> ScanResult<()> {
        let candles = self
            .data
            .fetch_candles(symbol, self.config.candle_count)
            .await?;
        let Some(last) = candles.last() else {
            return Ok(());
        };
        let close = last.close;
        let timestamp = last.timestamp;
        let Some(price) = Decimal::from_f64(close) else {
            return Err(ScanError::Engine(format!("non-finite close for {symbol}")));
        };

        self.last_prices
            .lock()
            .await
            .insert(symbol.to_string(), price);

        let mut series = CandleSeries::new(symbol);
        series.extend(candles);

        let outcome = self.aggregator.aggregate(voters, &series);
        let action = if self.ledger.position(symbol).await.is_some() {
            self.evaluate_exit(symbol, price).await?
        } else {
            self.evaluate_entry(symbol, &series, price, &outcome).await?
        };

        self.push_signal(WeightedSignal {
            symbol: symbol.to_string(),
            timestamp,
            price: close,
            votes: outcome.votes,
            score: outcome.score,
            decision: outcome.decision,
            confidence: outcome.confidence,
            action,
        })
        .await;
        Ok(())
    }

    async fn evaluate_exit(&self, symbol: &str, price: Decimal) -> ScanResult<String> {
        self.ledger.update_trailing_peak(symbol, price).await;
        let Some(position) = self.ledger.position(symbol).await else {
            return Ok("position_open".to_string());
        };
        let Some(reason) = self.money.check_exit(&position, price) else {
            return Ok("position_open".to_string());
        };

        let closed = self.ledger.close_position(symbol, price).await?;
        self.risk_state.lock().await.record_pnl(closed.pnl);
        info!(
            symbol,
            exit = reason.as_str(),
            price = %price,
            pnl = %closed.pnl,
            "position closed"
        );
        Ok(format!("position_closed ({})", reason.as_str()))
    }

    async fn evaluate_entry(
        &self,
        symbol: &str,
        series: &CandleSeries,
        price: Decimal,
        outcome: &AggregateOutcome,
    ) -> ScanResult<String> {
        if outcome.decision == Decision::Hold {
            return Ok("hold".to_string());
        }
        let side = match outcome.decision {
            Decision::Buy => Side::Buy,
            _ => Side::Sell,
        };

        let capital =
            self.config.initial_capital + self.ledger.realized_pnl().await;

        let gate = {
            let risk = self.risk_state.lock().await;
            self.money.check_daily_gate(capital, &risk)
        };
        if let Err(err) = gate {
            warn!(symbol, error = %err, "entry blocked by daily risk gate");
            return Ok(format!("blocked: {err}"));
        }

        let atr = match Atr::new(ATR_PERIOD).latest(&series.highs(), &series.lows(), &series.closes())
        {
            Ok(atr) => atr,
            Err(err) => {
                debug!(symbol, error = %err, "not enough data to size an entry");
                return Ok("skipped: insufficient data for sizing".to_string());
            }
        };

        let history = self.ledger.history().await;
        let Some(entry) = self.money.size_entry(capital, price, atr, side, &history) else {
            debug!(symbol, "entry suppressed by position sizing");
            return Ok("suppressed: unaffordable at current risk".to_string());
        };

        // Attribute the entry to the first voter agreeing with the decision
        let agreeing = match side {
            Side::Buy => Vote::Buy,
            Side::Sell => Vote::Sell,
        };
        let strategy_id = outcome
            .votes
            .iter()
            .find(|v| v.vote == agreeing)
            .map(|v| v.voter.clone());

        let position = Position {
            symbol: symbol.to_string(),
            side,
            entry_price: price,
            quantity: entry.quantity,
            stop_loss: entry.stop_loss,
            take_profit: entry.take_profit,
            trailing_peak: None,
            opened_at: Utc::now(),
            strategy_id,
        };
        let trade = self.ledger.open_position(position).await?;
        self.risk_state.lock().await.trades_today += 1;

        info!(
            symbol,
            side = ?side,
            quantity = %trade.quantity,
            price = %price,
            stop_loss = %entry.stop_loss,
            take_profit = %entry.take_profit,
            "position opened"
        );
        Ok("trade_executed".to_string())
    }

    async fn close_all_positions(&self) {
        let prices = self.last_prices.lock().await.clone();
        for position in self.ledger.open_positions().await {
            let Some(price) = prices.get(&position.symbol).copied() else {
                warn!(symbol = %position.symbol, "no last price, leaving position open");
                continue;
            };
            match self.ledger.close_position(&position.symbol, price).await {
                Ok(closed) => {
                    self.risk_state.lock().await.record_pnl(closed.pnl);
                    info!(symbol = %position.symbol, pnl = %closed.pnl, "closed position on shutdown");
                }
                Err(err) => {
                    warn!(symbol = %position.symbol, error = %err, "failed to close position on shutdown");
                }
            }
        }
    }

    async fn push_signal(&self, signal: WeightedSignal) {
        self.signals.lock().await.push(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use scanner_core::error::PersistenceError;
    use scanner_core::traits::StrategyEntry;
    use scanner_data::SimulatedDataSource;
    use scanner_ledger::{MemoryStrategyStore, MemoryTradeStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_engine(symbols: Vec<String>) -> Engine {
        let config = EngineConfig {
            symbols,
            ..EngineConfig::default()
        };
        Engine::new(
            config,
            Arc::new(SimulatedDataSource::new()),
            Arc::new(MemoryStrategyStore::new(Vec::new())),
            Arc::new(MemoryTradeStore::new()),
            MoneyManager::default(),
        )
    }

    #[tokio::test]
    async fn test_start_requires_symbols() {
        let engine = test_engine(Vec::new());
        let err = engine.start().await.unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_stop_clears_running() {
        let engine = test_engine(vec!["RELIANCE".to_string()]);

        engine.start().await.unwrap();
        engine.start().await.unwrap();
        assert!(engine.is_running().await);
        assert!(engine.snapshot().await.running);

        engine.stop().await;
        assert!(!engine.is_running().await);
        assert!(!engine.snapshot().await.running);

        // Stopping again is a no-op
        engine.stop().await;
    }

    #[tokio::test]
    async fn test_restart_resets_scan_count() {
        let engine = test_engine(vec!["RELIANCE".to_string()]);
        engine.reload_strategies().await.unwrap();
        engine.tick_once().await;
        engine.tick_once().await;
        assert_eq!(engine.snapshot().await.scan_count, 2);

        engine.start().await.unwrap();
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.scan_count, 0);
        engine.stop().await;
    }

    #[tokio::test]
    async fn test_tick_updates_snapshot() {
        let engine = test_engine(vec!["RELIANCE".to_string(), "TCS".to_string()]);
        engine.reload_strategies().await.unwrap();

        engine.tick_once().await;

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.scan_count, 1);
        assert!(snapshot.last_scan_at.is_some());
        assert_eq!(snapshot.capital, dec!(100000));
    }

    #[tokio::test]
    async fn test_every_scanned_symbol_logs_a_signal() {
        let engine = test_engine(vec!["RELIANCE".to_string(), "TCS".to_string()]);

        engine.tick_once().await;

        // One signal per symbol per scan, Hold outcomes included
        let signals = engine.recent_signals(10).await;
        assert_eq!(signals.len(), 2);
        assert!(signals.iter().all(|s| !s.action.is_empty()));

        engine.tick_once().await;
        assert_eq!(engine.recent_signals(10).await.len(), 4);
    }

    #[tokio::test]
    async fn test_exit_scan_logs_position_closed() {
        let engine = test_engine(vec!["RELIANCE".to_string()]);

        // Simulated prices are far above this target, so the first scan exits
        let position = Position {
            symbol: "RELIANCE".to_string(),
            side: Side::Buy,
            entry_price: dec!(1),
            quantity: dec!(1),
            stop_loss: dec!(0.5),
            take_profit: dec!(2),
            trailing_peak: None,
            opened_at: Utc::now(),
            strategy_id: None,
        };
        engine.inner.ledger.open_position(position).await.unwrap();

        engine.tick_once().await;

        assert!(engine.open_positions().await.is_empty());
        let signals = engine.recent_signals(1).await;
        assert_eq!(signals[0].action, "position_closed (take_profit)");
    }

    struct MutableStrategyStore {
        entries: Mutex<Vec<StrategyEntry>>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl StrategyStore for MutableStrategyStore {
        async fn list_enabled(&self) -> Result<Vec<StrategyEntry>, PersistenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.entries.lock().await.clone())
        }
    }

    #[tokio::test]
    async fn test_strategy_change_applies_on_next_tick() {
        let store = Arc::new(MutableStrategyStore {
            entries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        });
        let config = EngineConfig {
            symbols: vec!["RELIANCE".to_string()],
            ..EngineConfig::default()
        };
        let engine = Engine::new(
            config,
            Arc::new(SimulatedDataSource::new()),
            store.clone(),
            Arc::new(MemoryTradeStore::new()),
            MoneyManager::default(),
        );

        engine.tick_once().await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        // Empty store: the default eight-voter panel votes
        assert_eq!(engine.recent_signals(1).await[0].votes.len(), 8);

        *store.entries.lock().await = vec![StrategyEntry {
            id: "solo-sma".to_string(),
            voter_kind: "sma_crossover".to_string(),
            params: serde_json::Value::Null,
            weight: None,
        }];

        engine.tick_once().await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
        let signals = engine.recent_signals(1).await;
        assert_eq!(signals[0].votes.len(), 1);
        assert_eq!(signals[0].votes[0].voter, "solo-sma");
    }

    #[tokio::test]
    async fn test_empty_store_falls_back_to_default_panel() {
        let engine = test_engine(vec!["RELIANCE".to_string()]);
        let count = engine.reload_strategies().await.unwrap();
        assert_eq!(count, 8);
    }

    #[tokio::test]
    async fn test_open_position_is_never_doubled() {
        let engine = test_engine(vec!["RELIANCE".to_string()]);
        engine.reload_strategies().await.unwrap();

        let position = Position {
            symbol: "RELIANCE".to_string(),
            side: Side::Buy,
            entry_price: dec!(1),
            quantity: dec!(1),
            stop_loss: dec!(0.5),
            take_profit: dec!(100000),
            trailing_peak: None,
            opened_at: Utc::now(),
            strategy_id: None,
        };
        engine.inner.ledger.open_position(position).await.unwrap();

        // Exit-eval owns the symbol while a position is open; entry-eval
        // never runs, so a second open cannot happen in the same tick.
        engine.tick_once().await;
        let open = engine.open_positions().await;
        assert!(open.len() <= 1);
        assert!(engine.last_errors().await.is_empty());
    }
}
