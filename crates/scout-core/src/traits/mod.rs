//! Core traits for the opportunity scanner.

mod indicator;
mod market_data;
mod notifier;
mod store;

pub use indicator::{CandleIndicator, Indicator};
pub use market_data::MarketData;
pub use notifier::Notifier;
pub use store::{keys, SnapshotStore};
