//! Core types and traits for the scan engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Candle, CandleSeries)
//! - Votes, weighted signals, and decisions
//! - Position, trade, and engine-state types
//! - Seam traits for data sources, strategy stores, and trade stores

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ScanError, ScanResult};
pub use traits::*;
pub use types::*;
