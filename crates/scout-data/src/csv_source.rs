//! CSV-backed market data for offline runs and fixtures.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;

use scout_core::{Candle, DataError, Interval, MarketData};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Market data source reading `<SYMBOL>_<interval>.csv` files from a
/// directory. The universe is the directory listing; there is no volume
/// ranking offline, so pairs come back alphabetical.
pub struct CsvMarketData {
    dir: PathBuf,
}

impl CsvMarketData {
    /// Open a CSV source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Connection(format!(
                "no such directory: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    fn file_for(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.dir.join(format!("{symbol}_{interval}.csv"))
    }

    fn load(&self, path: &Path, symbol: &str) -> Result<Vec<Candle>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::Parse(format!("{symbol}: {e}")))?;

        let mut candles = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord =
                result.map_err(|e| DataError::Parse(format!("{symbol}: {e}")))?;
            let time = parse_timestamp(&record.date)?;
            candles.push(Candle::new(
                time,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        candles.sort_by_key(|c| c.time);
        Ok(candles)
    }
}

#[async_trait]
impl MarketData for CsvMarketData {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, DataError> {
        let path = self.file_for(symbol, interval);
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        let mut candles = self.load(&path, symbol)?;
        if candles.is_empty() {
            return Err(DataError::NoData(symbol.to_string()));
        }
        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }
        Ok(candles)
    }

    async fn fetch_top_pairs(&self, count: usize) -> Result<Vec<String>, DataError> {
        let entries =
            std::fs::read_dir(&self.dir).map_err(|e| DataError::Connection(e.to_string()))?;

        let mut symbols: Vec<String> = entries
            .filter_map(|entry| {
                let name = entry.ok()?.file_name().into_string().ok()?;
                let stem = name.strip_suffix(".csv")?;
                let (symbol, _interval) = stem.rsplit_once('_')?;
                Some(symbol.to_string())
            })
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols.truncate(count);
        Ok(symbols)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various timestamp formats into unix milliseconds.
fn parse_timestamp(raw: &str) -> Result<i64, DataError> {
    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    // Bare unix timestamp; assume milliseconds when > 10 digits
    if let Ok(ts) = raw.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(DataError::Parse(format!("could not parse date: {raw}")))
}
