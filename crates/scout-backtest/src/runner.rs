//! Walk-forward backtest engine.
//!
//! Replays history the way the live scanner would have seen it: at each
//! walk point the scoring engine sees only candles that had closed by
//! then, qualifying signals become simulated trades, and the tracker's
//! resolution state machine advances them one candle at a time.

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use scout_config::AppConfig;
use scout_core::{Candle, MarketData, ScoutResult, Trade};
use scout_signal::{score, ScoreRequest};
use scout_tracker::{register_signals, resolve_trade};

use crate::report::BacktestReport;
use crate::statistics::BacktestStats;
use serde::{Deserialize, Serialize};

/// Bounds for one backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestOptions {
    /// Maximum symbols drawn from the top of the universe.
    pub limit: usize,
    /// Days of history walked per symbol.
    pub days: i64,
}

/// Contract the optimizer searches through. One call, one stats block.
#[async_trait]
pub trait BacktestRunner: Send + Sync {
    async fn run_backtest(
        &self,
        config: &AppConfig,
        options: &BacktestOptions,
    ) -> ScoutResult<BacktestStats>;
}

/// Walk-forward backtest engine over a market data provider.
pub struct BacktestEngine<D> {
    data: D,
}

impl<D: MarketData> BacktestEngine<D> {
    pub fn new(data: D) -> Self {
        Self { data }
    }

    /// Run a full backtest and produce a report.
    ///
    /// Symbols run concurrently; a symbol whose history cannot be
    /// fetched is skipped with a warning. Identical inputs produce
    /// identical reports.
    pub async fn run(
        &self,
        config: &AppConfig,
        options: &BacktestOptions,
    ) -> ScoutResult<BacktestReport> {
        let symbols = self.data.fetch_top_pairs(options.limit).await?;

        let runs = join_all(
            symbols
                .iter()
                .map(|symbol| self.run_symbol(symbol, config, options)),
        )
        .await;

        let mut stats = BacktestStats::new();
        for run in runs.into_iter().flatten() {
            stats.symbols_tested += 1;
            stats.total_signals += run.signals;
            stats.candles_processed += run.candles;
            for trade in &run.trades {
                stats.record_trade(trade);
            }
        }
        stats.finalize();

        Ok(BacktestReport {
            options: *options,
            stats,
        })
    }

    /// Fetch one symbol's history and walk it. None drops the symbol.
    async fn run_symbol(
        &self,
        symbol: &str,
        config: &AppConfig,
        options: &BacktestOptions,
    ) -> Option<SymbolRun> {
        let scan = &config.scan;
        let days = options.days.max(0) as usize;
        // Pad by one scoring window so the walk starts with full history
        let ltf_limit = days * scan.ltf.candles_per_day() + scan.candle_limit;
        let htf_limit = days * scan.htf.candles_per_day() + scan.candle_limit;

        let fetched = futures::try_join!(
            self.data.fetch_candles(symbol, scan.htf, htf_limit),
            self.data.fetch_candles(symbol, scan.ltf, ltf_limit),
        );
        let (htf, ltf) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                warn!(symbol, error = %e, "skipping symbol, history unavailable");
                return None;
            }
        };
        if htf.is_empty() || ltf.is_empty() {
            warn!(symbol, "skipping symbol, empty history");
            return None;
        }

        let run = walk_symbol(symbol, self.data.name(), &htf, &ltf, config);
        debug!(
            symbol,
            signals = run.signals,
            trades = run.trades.len(),
            "symbol walk finished"
        );
        Some(run)
    }
}

#[async_trait]
impl<D: MarketData> BacktestRunner for BacktestEngine<D> {
    async fn run_backtest(
        &self,
        config: &AppConfig,
        options: &BacktestOptions,
    ) -> ScoutResult<BacktestStats> {
        Ok(self.run(config, options).await?.stats)
    }
}

/// One symbol's walk output.
pub(crate) struct SymbolRun {
    pub signals: usize,
    pub trades: Vec<Trade>,
    pub candles: usize,
}

/// Walk one symbol's history candle by candle.
///
/// Every candle advances the open trades first, then at scan-cadence
/// points the window ending at that candle is scored and qualifying
/// signals registered. Market caps are not replayed; scoring proceeds
/// without them.
pub(crate) fn walk_symbol(
    symbol: &str,
    source: &str,
    htf: &[Candle],
    ltf: &[Candle],
    config: &AppConfig,
) -> SymbolRun {
    let scan = &config.scan;
    let window = scan.candle_limit.max(1);
    let stride = ((scan.interval_minutes * 60) / scan.ltf.as_secs()).max(1) as usize;

    let start = window.min(ltf.len()) - 1;
    let mut trades: Vec<Trade> = Vec::new();
    let mut signals = 0;
    let mut htf_end = 0;

    for t in start..ltf.len() {
        let now = ltf[t].time;

        for trade in trades.iter_mut().filter(|t| t.is_open()) {
            resolve_trade(
                trade,
                std::slice::from_ref(&ltf[t]),
                scan.ltf,
                &config.tracker,
            );
        }

        if (t - start) % stride != 0 {
            continue;
        }

        // Only higher-timeframe candles fully closed by this walk point
        // are visible to the trend read
        let closes_by = now + scan.ltf.as_millis();
        while htf_end < htf.len() && htf[htf_end].time + scan.htf.as_millis() <= closes_by {
            htf_end += 1;
        }

        let ltf_window = &ltf[t + 1 - window.min(t + 1)..=t];
        let htf_window = &htf[htf_end.saturating_sub(window)..htf_end];
        if htf_window.is_empty() {
            continue;
        }

        let request = ScoreRequest {
            symbol,
            source,
            htf_candles: htf_window,
            ltf_candles: ltf_window,
            htf: scan.htf,
            ltf: scan.ltf,
            timestamp: now,
            market_cap: None,
        };
        let signal = score(&request, &config.strategy);

        if signal.score >= config.tracker.min_score && signal.has_setup() {
            signals += 1;
            register_signals(&mut trades, &[signal], &config.tracker);
        }
    }

    SymbolRun {
        signals,
        trades,
        candles: ltf.len(),
    }
}
