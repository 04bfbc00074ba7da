//! Binance spot market data source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use scout_config::DataConfig;
use scout_core::{Candle, DataError, Interval, MarketData};

use crate::cache::CandleCache;

/// Hard cap the venue puts on a single klines request.
const MAX_KLINES_PER_REQUEST: usize = 1000;

/// Leveraged-token name fragments excluded from the scan universe.
const LEVERAGED_SUFFIXES: [&str; 4] = ["UP", "DOWN", "BULL", "BEAR"];

/// 24h ticker statistics, one row per market.
#[derive(Debug, Deserialize)]
struct TickerStats {
    symbol: String,
    #[serde(rename = "quoteVolume")]
    quote_volume: String,
}

/// Binance REST client.
///
/// Candle fetches go through a TTL'd in-memory cache so the scanner and
/// tracker can share one fetch per symbol within a cycle.
pub struct BinanceMarketData {
    config: DataConfig,
    client: Client,
    cache: CandleCache,
}

impl BinanceMarketData {
    /// Create a new Binance client from data settings.
    pub fn new(config: DataConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DataError::Connection(e.to_string()))?;
        let cache = CandleCache::new(Duration::from_secs(config.cache_ttl_secs));

        Ok(Self {
            config,
            client,
            cache,
        })
    }

    /// Fetch one page of klines, ascending, optionally bounded by an end
    /// time in milliseconds.
    async fn klines_page(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
        end_time: Option<i64>,
    ) -> Result<Vec<Candle>, DataError> {
        let url = format!("{}/api/v3/klines", self.config.base_url);

        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(end) = end_time {
            params.push(("endTime", end.to_string()));
        }

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::Api(format!("{}: {}", status, text)));
        }

        let rows: Vec<Vec<Value>> = resp
            .json()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let mut candles = rows
            .iter()
            .map(|row| parse_kline(symbol, row))
            .collect::<Result<Vec<_>, _>>()?;
        candles.sort_by_key(|c| c.time);
        Ok(candles)
    }
}

#[async_trait]
impl MarketData for BinanceMarketData {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, DataError> {
        if let Some(hit) = self.cache.get(symbol, interval, limit) {
            debug!(symbol, %interval, "candle cache hit");
            return Ok(hit);
        }

        // Requests above the per-call cap page backwards through endTime
        let mut pages: Vec<Vec<Candle>> = Vec::new();
        let mut remaining = limit;
        let mut end_time: Option<i64> = None;
        while remaining > 0 {
            let batch = remaining.min(MAX_KLINES_PER_REQUEST);
            let page = self.klines_page(symbol, interval, batch, end_time).await?;
            if page.is_empty() {
                break;
            }
            let exhausted = page.len() < batch;
            end_time = page.first().map(|c| c.time - 1);
            remaining -= page.len().min(remaining);
            pages.push(page);
            if exhausted {
                break;
            }
        }

        let candles: Vec<Candle> = pages.into_iter().rev().flatten().collect();
        if candles.is_empty() {
            return Err(DataError::NoData(symbol.to_string()));
        }

        self.cache.put(symbol, interval, &candles);
        debug!(symbol, %interval, count = candles.len(), "candles fetched");
        Ok(candles)
    }

    async fn fetch_top_pairs(&self, count: usize) -> Result<Vec<String>, DataError> {
        let url = format!("{}/api/v3/ticker/24hr", self.config.base_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::Api(format!("{}: {}", status, text)));
        }

        let tickers: Vec<TickerStats> = resp
            .json()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let pairs = rank_pairs(tickers, &self.config.quote_asset, count);
        debug!(pairs = pairs.len(), "scan universe built");
        Ok(pairs)
    }

    fn name(&self) -> &str {
        "binance"
    }
}

/// Rank quote-asset markets by 24h quote volume, excluding leveraged
/// tokens, and keep the top `count`.
fn rank_pairs(tickers: Vec<TickerStats>, quote_asset: &str, count: usize) -> Vec<String> {
    let mut ranked: Vec<(String, f64)> = tickers
        .into_iter()
        .filter_map(|t| {
            let base = t.symbol.strip_suffix(quote_asset)?;
            if base.is_empty() || is_leveraged(base) {
                return None;
            }
            let volume = t.quote_volume.parse::<f64>().ok()?;
            Some((t.symbol, volume))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(count);
    ranked.into_iter().map(|(symbol, _)| symbol).collect()
}

fn is_leveraged(base: &str) -> bool {
    LEVERAGED_SUFFIXES.iter().any(|s| base.ends_with(s))
}

/// Parse one kline row. The venue sends each candle as a mixed-type
/// array: open time as a number, prices and volume as strings.
fn parse_kline(symbol: &str, row: &[Value]) -> Result<Candle, DataError> {
    let time = row
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| DataError::Parse(format!("{symbol}: missing kline open time")))?;

    let field = |index: usize, name: &str| -> Result<f64, DataError> {
        row.get(index)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| DataError::Parse(format!("{symbol}: bad kline {name}")))
    };

    Ok(Candle::new(
        time,
        field(1, "open")?,
        field(2, "high")?,
        field(3, "low")?,
        field(4, "close")?,
        field(5, "volume")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_kline_row() {
        let row = vec![
            json!(1700000000000_i64),
            json!("100.5"),
            json!("101.0"),
            json!("99.5"),
            json!("100.8"),
            json!("12345.6"),
            json!(1700003599999_i64),
        ];

        let candle = parse_kline("BTCUSDT", &row).unwrap();
        assert_eq!(candle.time, 1700000000000);
        assert_eq!(candle.open, 100.5);
        assert_eq!(candle.close, 100.8);
        assert_eq!(candle.volume, 12345.6);
    }

    #[test]
    fn test_parse_kline_rejects_malformed_row() {
        let row = vec![json!("not a timestamp"), json!("100.5")];
        assert!(parse_kline("BTCUSDT", &row).is_err());

        let row = vec![json!(1700000000000_i64), json!("not a number")];
        assert!(parse_kline("BTCUSDT", &row).is_err());
    }

    #[test]
    fn test_rank_pairs_filters_and_sorts() {
        let tickers = vec![
            TickerStats {
                symbol: "BTCUSDT".to_string(),
                quote_volume: "5000000".to_string(),
            },
            TickerStats {
                symbol: "ETHUSDT".to_string(),
                quote_volume: "9000000".to_string(),
            },
            // Wrong quote asset
            TickerStats {
                symbol: "ETHBTC".to_string(),
                quote_volume: "9999999".to_string(),
            },
            // Leveraged token
            TickerStats {
                symbol: "BTCUPUSDT".to_string(),
                quote_volume: "8888888".to_string(),
            },
            TickerStats {
                symbol: "SOLUSDT".to_string(),
                quote_volume: "3000000".to_string(),
            },
        ];

        let pairs = rank_pairs(tickers, "USDT", 2);
        assert_eq!(pairs, vec!["ETHUSDT".to_string(), "BTCUSDT".to_string()]);
    }

    #[test]
    fn test_rank_pairs_skips_unparseable_volume() {
        let tickers = vec![TickerStats {
            symbol: "BTCUSDT".to_string(),
            quote_volume: "n/a".to_string(),
        }];
        assert!(rank_pairs(tickers, "USDT", 10).is_empty());
    }
}
