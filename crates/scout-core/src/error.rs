//! Error types for the opportunity scanner.

use thiserror::Error;

/// Top-level scanner error.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Notify error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Market data errors.
///
/// A symbol whose candles cannot be fetched or parsed is dropped from the
/// current scan batch; the cycle continues with the rest of the universe.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No candles returned for {0}")]
    NoData(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Persistence errors.
///
/// Load sites treat corrupt or missing state as empty and cold-start;
/// save failures propagate to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Notification errors. Deliveries are fire-and-forget; callers log and
/// continue.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Send failed: {0}")]
    Send(String),
}

/// Result type alias for scanner operations.
pub type ScoutResult<T> = Result<T, ScoutError>;
