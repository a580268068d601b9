//! Error types for the scan engine.

use thiserror::Error;

/// Top-level scan engine error.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Risk gate blocked entry: {reason}")]
    RiskLimitExceeded { reason: String },

    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Engine error: {0}")]
    Engine(String),
}

/// Market data source errors.
///
/// All variants are non-fatal for the tick as a whole: a failed fetch
/// skips that symbol until the next scan.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },
}

/// Ledger invariant violations.
///
/// These indicate a sequencing bug in the caller if they ever fire from
/// the orchestrator's own flow; the ledger rejects rather than corrupting
/// its state.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Position already open for {0}")]
    AlreadyOpen(String),

    #[error("No open position for {0}")]
    NoOpenPosition(String),
}

/// External store write failures. Logged; the in-memory decision stands.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Trade store write failed: {0}")]
    WriteFailed(String),

    #[error("Strategy store unreachable: {0}")]
    StoreUnreachable(String),
}

/// Result type alias for scan engine operations.
pub type ScanResult<T> = Result<T, ScanError>;
