//! Core data types for the scan engine.

mod candle;
mod position;
mod snapshot;
mod vote;

pub use candle::{Candle, CandleSeries};
pub use position::{Position, Side, Trade, TradeStatus};
pub use snapshot::{EngineMode, EngineSnapshot, RiskState};
pub use vote::{Decision, Vote, VoteRecord, WeightedSignal};
