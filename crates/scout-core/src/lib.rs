//! Core types and traits for the opportunity scanner.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Candle, CandleSeries, Interval)
//! - Signal types (trend/momentum/pullback contexts, trade setups, scores)
//! - Forward-test trade types and lifecycle enums
//! - Traits for indicators, market data providers, notifiers and stores

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, NotifyError, ScoutError, ScoutResult, StoreError};
pub use traits::*;
pub use types::*;
