//! OHLCV candle data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Interval;

/// Compact OHLCV candle optimized for indicator math.
/// Uses f64 for fast numeric transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Candle {
    /// Open time as unix timestamp in milliseconds
    pub time: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded base-asset volume
    pub volume: f64,
}

impl Candle {
    /// Create a new candle.
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the candle's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Calculate the candle's body size (absolute open-to-close move).
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Length of the wick above the body.
    #[inline]
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Length of the wick below the body.
    #[inline]
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Check if the candle is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the candle is bearish (close < open).
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Get the open time as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.time)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }
}

impl Default for Candle {
    fn default() -> Self {
        Self {
            time: 0,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            volume: 0.0,
        }
    }
}

/// Time-series container for candles, optimized for sequential access.
///
/// Appends keep the series ascending; a candle carrying the same open time
/// as the newest stored one replaces it in place, which is how the live
/// forming candle updates between fetches.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Interval of the candles
    pub interval: Interval,
    /// Candles stored in a deque for cheap front eviction
    candles: VecDeque<Candle>,
    /// Maximum capacity (0 = unlimited)
    capacity: usize,
}

impl CandleSeries {
    /// Create a new empty candle series.
    pub fn new(symbol: String, interval: Interval) -> Self {
        Self {
            symbol,
            interval,
            candles: VecDeque::new(),
            capacity: 0,
        }
    }

    /// Create a candle series with a maximum capacity.
    /// When capacity is reached, oldest candles are removed.
    pub fn with_capacity(symbol: String, interval: Interval, capacity: usize) -> Self {
        Self {
            symbol,
            interval,
            candles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new candle, replacing the newest one when the open time
    /// matches and evicting the oldest when at capacity.
    pub fn push(&mut self, candle: Candle) {
        if let Some(last) = self.candles.back_mut() {
            if last.time == candle.time {
                *last = candle;
                return;
            }
        }
        if self.capacity > 0 && self.candles.len() >= self.capacity {
            self.candles.pop_front();
        }
        self.candles.push_back(candle);
    }

    /// Push multiple candles.
    pub fn extend(&mut self, candles: impl IntoIterator<Item = Candle>) {
        for candle in candles {
            self.push(candle);
        }
    }

    /// Get the number of candles.
    #[inline]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Get the last candle.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }

    /// Get a candle by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    /// Copy out the whole series, oldest first.
    pub fn to_vec(&self) -> Vec<Candle> {
        self.candles.iter().copied().collect()
    }

    /// Copy out the most recent n candles, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<Candle> {
        let start = self.candles.len().saturating_sub(n);
        self.candles.iter().skip(start).copied().collect()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// Clear all candles.
    pub fn clear(&mut self) {
        self.candles.clear();
    }

    /// Get an iterator over the candles.
    pub fn iter(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_calculations() {
        let candle = Candle::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        assert!((candle.typical_price() - 103.333333).abs() < 0.001);
        assert!((candle.range() - 15.0).abs() < 0.001);
        assert!((candle.body() - 5.0).abs() < 0.001);
        assert!((candle.upper_wick() - 5.0).abs() < 0.001);
        assert!((candle.lower_wick() - 5.0).abs() < 0.001);
        assert!(candle.is_bullish());
        assert!(!candle.is_bearish());
    }

    #[test]
    fn test_candle_true_range() {
        let candle = Candle::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        // Without previous close
        assert!((candle.true_range(None) - 15.0).abs() < 0.001);

        // With previous close that creates a gap
        assert!((candle.true_range(Some(90.0)) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_series_capacity() {
        let mut series = CandleSeries::with_capacity("BTCUSDT".to_string(), Interval::Hour1, 3);

        series.push(Candle::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Candle::new(2, 100.5, 102.0, 100.0, 101.5, 1000.0));
        series.push(Candle::new(3, 101.5, 103.0, 101.0, 102.5, 1000.0));
        assert_eq!(series.len(), 3);

        // Oldest candle is evicted at capacity
        series.push(Candle::new(4, 102.5, 104.0, 102.0, 103.5, 1000.0));
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0).unwrap().time, 2);
    }

    #[test]
    fn test_series_forming_candle_replace() {
        let mut series = CandleSeries::new("BTCUSDT".to_string(), Interval::Hour1);
        series.push(Candle::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Candle::new(2, 100.5, 101.0, 100.0, 100.8, 500.0));

        // Same open time updates the forming candle instead of appending
        series.push(Candle::new(2, 100.5, 102.0, 100.0, 101.5, 900.0));
        assert_eq!(series.len(), 2);
        assert!((series.last().unwrap().close - 101.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_series_extractions() {
        let mut series = CandleSeries::new("BTCUSDT".to_string(), Interval::Hour1);
        series.push(Candle::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Candle::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0));

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![1000.0, 2000.0]);
        assert_eq!(series.last_n(1)[0].time, 2);
    }
}
