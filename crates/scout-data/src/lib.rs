//! Market data sources, snapshot persistence, and notification sinks.
//!
//! Everything here implements a `scout-core` trait: `BinanceMarketData`
//! and `CsvMarketData` are `MarketData` providers, `JsonStore` is the
//! `SnapshotStore`, and the notifiers deliver `Notifier` events. The
//! core crates never name these types; they are wired in by the binary.

mod binance;
mod cache;
mod csv_source;
mod notify;
mod store;
mod universe;

pub use binance::BinanceMarketData;
pub use cache::CandleCache;
pub use csv_source::CsvMarketData;
pub use notify::{LogNotifier, WebhookNotifier};
pub use store::JsonStore;
pub use universe::PinnedUniverse;
