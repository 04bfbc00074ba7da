//! Candle caching.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use scout_core::{Candle, CandleSeries, Interval};

/// Upper bound on candles retained per cached series.
const MAX_CACHED_CANDLES: usize = 5_000;

struct CacheEntry {
    series: CandleSeries,
    fetched_at: Instant,
}

/// TTL'd in-memory candle cache keyed by symbol and interval.
///
/// Entries outlive their TTL so a refresh can merge into the existing
/// series: the forming candle is replaced in place and newly closed
/// candles are appended, keeping one continuous series per market.
pub struct CandleCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl CandleCache {
    /// Create a cache whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cache_key(symbol: &str, interval: Interval) -> String {
        format!("{symbol}_{interval}")
    }

    /// Serve the most recent `limit` candles when the entry is fresh and
    /// deep enough. Stale or shallow entries miss.
    pub fn get(&self, symbol: &str, interval: Interval, limit: usize) -> Option<Vec<Candle>> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(&Self::cache_key(symbol, interval))?;
        if entry.fetched_at.elapsed() >= self.ttl || entry.series.len() < limit {
            return None;
        }
        Some(entry.series.last_n(limit))
    }

    /// Merge freshly fetched candles into the cached series and mark the
    /// entry fresh. `candles` must be ascending by open time.
    pub fn put(&self, symbol: &str, interval: Interval, candles: &[Candle]) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let entry = entries
            .entry(Self::cache_key(symbol, interval))
            .or_insert_with(|| CacheEntry {
                series: CandleSeries::with_capacity(
                    symbol.to_string(),
                    interval,
                    MAX_CACHED_CANDLES,
                ),
                fetched_at: Instant::now(),
            });

        // A fetch that no longer overlaps the cached series restarts it;
        // a served window must never span a hole in history.
        let contiguous = match (entry.series.last(), candles.first()) {
            (Some(last), Some(first)) => first.time <= last.time + interval.as_millis(),
            _ => true,
        };
        if !contiguous {
            entry.series.clear();
        }

        let newest = entry.series.last().map(|c| c.time);
        for candle in candles {
            if newest.is_some_and(|t| candle.time < t) {
                continue;
            }
            entry.series.push(*candle);
        }
        entry.fetched_at = Instant::now();
    }

    /// Drop every cached series.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
