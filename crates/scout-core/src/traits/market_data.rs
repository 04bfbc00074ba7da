//! Market data provider trait.

use crate::error::DataError;
use crate::types::{Candle, Interval};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for market data providers.
///
/// Implementations own all throttling, caching and retry policy; the core
/// only ever observes an ordered candle sequence or an error.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch up to `limit` most recent candles for a symbol, ordered
    /// oldest to newest.
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, DataError>;

    /// Fetch the venue's top trading pairs ranked by 24h quote volume.
    async fn fetch_top_pairs(&self, count: usize) -> Result<Vec<String>, DataError>;

    /// Fetch market capitalizations keyed by symbol. Optional enrichment;
    /// the default implementation reports nothing and scoring proceeds
    /// without cap data.
    async fn fetch_market_caps(
        &self,
        _symbols: &[String],
    ) -> Result<HashMap<String, f64>, DataError> {
        Ok(HashMap::new())
    }

    /// Get the venue label, recorded on every emitted signal.
    fn name(&self) -> &str;
}

// Shared handles forward, so one provider (and its cache) can serve the
// scanner and the tracker at once.
#[async_trait]
impl<T: MarketData + ?Sized> MarketData for Arc<T> {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, DataError> {
        (**self).fetch_candles(symbol, interval, limit).await
    }

    async fn fetch_top_pairs(&self, count: usize) -> Result<Vec<String>, DataError> {
        (**self).fetch_top_pairs(count).await
    }

    async fn fetch_market_caps(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, f64>, DataError> {
        (**self).fetch_market_caps(symbols).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
