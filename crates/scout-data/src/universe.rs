//! Universe-pinning adapter.

use std::collections::HashMap;

use async_trait::async_trait;

use scout_core::{Candle, DataError, Interval, MarketData};

/// Wraps a provider and pins `fetch_top_pairs` to a fixed symbol list,
/// for runs that name explicit markets. Everything else passes through.
pub struct PinnedUniverse<D> {
    inner: D,
    symbols: Vec<String>,
}

impl<D> PinnedUniverse<D> {
    pub fn new(inner: D, symbols: Vec<String>) -> Self {
        Self { inner, symbols }
    }
}

#[async_trait]
impl<D: MarketData> MarketData for PinnedUniverse<D> {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, DataError> {
        self.inner.fetch_candles(symbol, interval, limit).await
    }

    async fn fetch_top_pairs(&self, count: usize) -> Result<Vec<String>, DataError> {
        Ok(self.symbols.iter().take(count).cloned().collect())
    }

    async fn fetch_market_caps(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, f64>, DataError> {
        self.inner.fetch_market_caps(symbols).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
