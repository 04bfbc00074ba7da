//! Scan orchestration.
//!
//! Drives the scoring engine over a ranked symbol universe in
//! rate-limited concurrent batches, merges the results into cross-cycle
//! consistency state and persists the cycle's output. One scanner
//! instance runs at a time; cycles never overlap, so all state is read
//! once at cycle start and replaced once at cycle end.

pub mod consistency;

pub use consistency::{merge_consistency, ConsistencyOutcome};

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};

use scout_config::AppConfig;
use scout_core::{
    keys, ConsistencyMap, ConsistencyStatus, MarketData, Notifier, ScoutResult, Signal,
    SnapshotStore,
};
use scout_signal::{score, ScoreRequest};

/// Outcome of one scan cycle.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Highest-scoring signals, sorted descending, capped at the
    /// configured persist count.
    pub signals: Vec<Signal>,
    /// Streak status per symbol that cleared the save threshold.
    pub statuses: HashMap<String, ConsistencyStatus>,
    /// Symbols scored this cycle.
    pub scanned: usize,
    /// Symbols dropped for missing or failed data.
    pub dropped: usize,
}

/// Batch scan orchestrator.
pub struct Scanner<D, S, N> {
    data: D,
    store: S,
    notifier: N,
    config: AppConfig,
}

impl<D, S, N> Scanner<D, S, N>
where
    D: MarketData,
    S: SnapshotStore,
    N: Notifier,
{
    pub fn new(data: D, store: S, notifier: N, config: AppConfig) -> Self {
        Self {
            data,
            store,
            notifier,
            config,
        }
    }

    /// Run one full scan cycle: fetch the universe, score it in batches,
    /// merge consistency state and persist the results.
    ///
    /// A symbol that fails mid-batch is dropped from this cycle only; a
    /// universe that cannot be fetched at all yields an empty report
    /// rather than an error.
    pub async fn run_cycle(&self) -> ScoutResult<ScanReport> {
        let scan = &self.config.scan;
        let now_ms = Utc::now().timestamp_millis();

        let symbols = match self.data.fetch_top_pairs(scan.symbols).await {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!(error = %e, "could not fetch symbol universe, skipping cycle");
                return Ok(ScanReport::default());
            }
        };
        info!(count = symbols.len(), source = self.data.name(), "scan cycle started");

        let prior = self.load_consistency();
        let caps = match self.data.fetch_market_caps(&symbols).await {
            Ok(caps) => caps,
            Err(e) => {
                warn!(error = %e, "market cap lookup failed, scoring without caps");
                HashMap::new()
            }
        };

        let mut signals = Vec::with_capacity(symbols.len());
        let mut dropped = 0;
        let mut batches = symbols.chunks(scan.batch_size.max(1)).peekable();
        while let Some(batch) = batches.next() {
            let results = join_all(
                batch
                    .iter()
                    .map(|symbol| self.scan_symbol(symbol, &caps, now_ms)),
            )
            .await;
            for result in results {
                match result {
                    Some(signal) => signals.push(signal),
                    None => dropped += 1,
                }
            }
            if batches.peek().is_some() {
                tokio::time::sleep(Duration::from_millis(scan.batch_pause_ms)).await;
            }
        }

        let outcome = merge_consistency(&prior, &signals, scan, now_ms);

        signals.sort_by(|a, b| b.score.total_cmp(&a.score));
        // High-quality signals are audited even past the persist cap
        let high: Vec<Signal> = signals
            .iter()
            .take_while(|s| s.score >= scan.audit_threshold)
            .cloned()
            .collect();
        signals.truncate(scan.top_signals);

        for signal in &signals {
            let status = outcome
                .statuses
                .get(&signal.symbol)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            debug!(
                symbol = %signal.symbol,
                score = signal.score,
                status = %status,
                "cycle signal"
            );
        }

        self.persist(&signals, &outcome.records, &high)?;
        self.notify(high).await;

        let scanned = symbols.len() - dropped;
        info!(scanned, dropped, kept = signals.len(), "scan cycle finished");

        Ok(ScanReport {
            signals,
            statuses: outcome.statuses,
            scanned,
            dropped,
        })
    }

    /// Fetch both timeframes and score one symbol. Any data failure
    /// drops the symbol from the cycle.
    async fn scan_symbol(
        &self,
        symbol: &str,
        caps: &HashMap<String, f64>,
        now_ms: i64,
    ) -> Option<Signal> {
        let scan = &self.config.scan;
        let fetched = tokio::try_join!(
            self.data.fetch_candles(symbol, scan.htf, scan.candle_limit),
            self.data.fetch_candles(symbol, scan.ltf, scan.candle_limit),
        );
        let (htf, ltf) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                warn!(symbol, error = %e, "dropping symbol this cycle");
                return None;
            }
        };
        if htf.is_empty() || ltf.is_empty() {
            warn!(symbol, "no candle history, dropping symbol this cycle");
            return None;
        }

        let request = ScoreRequest {
            symbol,
            source: self.data.name(),
            htf_candles: &htf,
            ltf_candles: &ltf,
            htf: scan.htf,
            ltf: scan.ltf,
            timestamp: now_ms,
            market_cap: caps.get(symbol).copied(),
        };
        Some(score(&request, &self.config.strategy))
    }

    /// Load the prior consistency snapshot, cold-starting from empty on
    /// missing or corrupt state.
    fn load_consistency(&self) -> ConsistencyMap {
        match self.store.read::<ConsistencyMap>(keys::CONSISTENCY) {
            Ok(Some(map)) => map,
            Ok(None) => ConsistencyMap::new(),
            Err(e) => {
                warn!(error = %e, "consistency state unreadable, cold-starting empty");
                ConsistencyMap::new()
            }
        }
    }

    fn persist(
        &self,
        signals: &[Signal],
        records: &ConsistencyMap,
        high: &[Signal],
    ) -> ScoutResult<()> {
        self.store.replace(keys::SIGNALS, signals)?;
        self.store.replace(keys::CONSISTENCY, records)?;
        for signal in high {
            self.store.append(keys::AUDIT, signal)?;
        }
        Ok(())
    }

    async fn notify(&self, high: Vec<Signal>) {
        if high.is_empty() {
            return;
        }
        if let Err(e) = self.notifier.notify_high_score(&high).await {
            warn!(error = %e, "high score notification failed");
        }
    }
}
