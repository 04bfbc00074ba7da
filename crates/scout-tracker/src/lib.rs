//! Forward-test trade tracking.
//!
//! Registers qualifying signals as paper trades and resolves their
//! outcomes by replaying fresh candles through the lifecycle state
//! machine in [`resolution`]. The tracker owns the persisted trade
//! list; nothing else mutates it.

pub mod resolution;

pub use resolution::resolve_trade;

use tracing::{info, warn};

use scout_config::{AppConfig, TrackerConfig};
use scout_core::{keys, MarketData, Notifier, ScoutResult, Signal, SnapshotStore, Trade};

/// Outcome of one tracking pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackerReport {
    /// Trades newly registered from this cycle's signals
    pub registered: usize,
    /// Entries filled during resolution
    pub filled: usize,
    /// Trades that reached a terminal state
    pub closed: usize,
    /// Trades still open after the pass
    pub open: usize,
}

/// Fold qualifying signals into the trade list. Returns the number of
/// trades registered.
///
/// One live idea per symbol: a filled open trade blocks re-entry, an
/// unfilled one is replaced by the fresher setup.
pub fn register_signals(
    trades: &mut Vec<Trade>,
    signals: &[Signal],
    config: &TrackerConfig,
) -> usize {
    let mut registered = 0;
    for signal in signals {
        if signal.score < config.min_score {
            continue;
        }
        let Some(trade) = Trade::from_signal(signal) else {
            continue;
        };

        match trades
            .iter()
            .position(|t| t.is_open() && t.symbol == signal.symbol)
        {
            Some(i) if trades[i].is_filled => continue,
            Some(i) => {
                info!(symbol = %signal.symbol, "replacing unfilled trade with fresher setup");
                trades[i] = trade;
            }
            None => trades.push(trade),
        }
        registered += 1;
    }
    registered
}

/// Trade tracker: registration, resolution and persistence.
pub struct Tracker<D, S, N> {
    data: D,
    store: S,
    notifier: N,
    config: AppConfig,
}

impl<D, S, N> Tracker<D, S, N>
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

    /// Run one tracking pass: register fresh signals, then replay
    /// candles through every open trade and persist the updated list.
    ///
    /// A symbol whose candles cannot be fetched keeps its trade open
    /// for the next pass; notification failures are logged and ignored.
    pub async fn process(&self, signals: &[Signal]) -> ScoutResult<TrackerReport> {
        let mut trades = self.load_trades();
        let registered = register_signals(&mut trades, signals, &self.config.tracker);

        let mut filled = 0;
        let mut closed = 0;
        for trade in trades.iter_mut().filter(|t| t.is_open()) {
            let candles = match self
                .data
                .fetch_candles(&trade.symbol, self.config.scan.ltf, self.config.scan.candle_limit)
                .await
            {
                Ok(candles) => candles,
                Err(e) => {
                    warn!(symbol = %trade.symbol, error = %e, "resolution deferred to next pass");
                    continue;
                }
            };

            let was_filled = trade.is_filled;
            resolve_trade(trade, &candles, self.config.scan.ltf, &self.config.tracker);

            if trade.is_filled && !was_filled {
                filled += 1;
                if let Err(e) = self.notifier.notify_entry(trade).await {
                    warn!(symbol = %trade.symbol, error = %e, "entry notification failed");
                }
            }
            if !trade.is_open() {
                closed += 1;
                info!(
                    symbol = %trade.symbol,
                    result = %trade.result,
                    pnl = trade.pnl_pct.unwrap_or(0.0),
                    "trade closed"
                );
                if let Err(e) = self.notifier.notify_exit(trade).await {
                    warn!(symbol = %trade.symbol, error = %e, "exit notification failed");
                }
            }
        }

        self.store.replace(keys::TRADES, &trades)?;

        let open = trades.iter().filter(|t| t.is_open()).count();
        info!(registered, filled, closed, open, "tracking pass finished");

        Ok(TrackerReport {
            registered,
            filled,
            closed,
            open,
        })
    }

    /// Read the persisted trade list, cold-starting empty when missing
    /// or corrupt.
    fn load_trades(&self) -> Vec<Trade> {
        match self.store.read::<Vec<Trade>>(keys::TRADES) {
            Ok(Some(trades)) => trades,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "trade list unreadable, cold-starting empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_core::{
        Candle, ConfluenceType, DataError, Interval, MomentumContext, NotifyError,
        PullbackContext, ScoreBreakdown, StoreError, TradeResult, TradeSetup, TradeSide,
        TrendContext,
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn signal(symbol: &str, score: f64) -> Signal {
        Signal {
            symbol: symbol.to_string(),
            source: "binance".to_string(),
            htf: Interval::Hour4,
            ltf: Interval::Hour1,
            price: 102.0,
            score,
            setup: Some(TradeSetup {
                entry: 100.0,
                stop_loss: 95.0,
                take_profit: 110.0,
                risk_reward: 2.0,
                side: TradeSide::Long,
                confluence: ConfluenceType::StructureOnly,
            }),
            breakdown: ScoreBreakdown::default(),
            trend: TrendContext::default(),
            momentum: MomentumContext::default(),
            pullback: PullbackContext::default(),
            timestamp: 0,
        }
    }

    fn setupless_signal(symbol: &str, score: f64) -> Signal {
        Signal {
            setup: None,
            ..signal(symbol, score)
        }
    }

    #[test]
    fn test_register_filters_low_scores_and_missing_setups() {
        let mut trades = Vec::new();
        let signals = vec![
            signal("AAAUSDT", 85.0),
            signal("BBBUSDT", 50.0),
            setupless_signal("CCCUSDT", 90.0),
        ];

        let registered = register_signals(&mut trades, &signals, &TrackerConfig::default());

        assert_eq!(registered, 1);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].symbol, "AAAUSDT");
    }

    #[test]
    fn test_register_skips_filled_open_trade() {
        let mut trades = Vec::new();
        register_signals(&mut trades, &[signal("AAAUSDT", 85.0)], &TrackerConfig::default());
        trades[0].fill(1_000);

        let registered =
            register_signals(&mut trades, &[signal("AAAUSDT", 95.0)], &TrackerConfig::default());

        assert_eq!(registered, 0);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].score, 85.0);
    }

    #[test]
    fn test_register_replaces_unfilled_open_trade() {
        let mut trades = Vec::new();
        register_signals(&mut trades, &[signal("AAAUSDT", 85.0)], &TrackerConfig::default());
        let first_id = trades[0].id;

        let registered =
            register_signals(&mut trades, &[signal("AAAUSDT", 95.0)], &TrackerConfig::default());

        assert_eq!(registered, 1);
        assert_eq!(trades.len(), 1);
        assert_ne!(trades[0].id, first_id);
        assert_eq!(trades[0].score, 95.0);
    }

    #[test]
    fn test_register_allows_new_trade_after_close() {
        let mut trades = Vec::new();
        register_signals(&mut trades, &[signal("AAAUSDT", 85.0)], &TrackerConfig::default());
        trades[0].close(TradeResult::Expired, None, 1_000, 0.0);

        let registered =
            register_signals(&mut trades, &[signal("AAAUSDT", 90.0)], &TrackerConfig::default());

        assert_eq!(registered, 1);
        assert_eq!(trades.len(), 2);
    }

    struct FakeData {
        candles: HashMap<String, Vec<Candle>>,
    }

    #[async_trait]
    impl MarketData for FakeData {
        async fn fetch_candles(
            &self,
            symbol: &str,
            _interval: Interval,
            _limit: usize,
        ) -> Result<Vec<Candle>, DataError> {
            self.candles
                .get(symbol)
                .cloned()
                .ok_or_else(|| DataError::NoData(symbol.to_string()))
        }

        async fn fetch_top_pairs(&self, _count: usize) -> Result<Vec<String>, DataError> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, serde_json::Value>>,
    }

    impl SnapshotStore for MemoryStore {
        fn read<T: serde::de::DeserializeOwned>(
            &self,
            key: &str,
        ) -> Result<Option<T>, StoreError> {
            let values = self.values.lock().unwrap();
            match values.get(key) {
                Some(v) => Ok(serde_json::from_value(v.clone()).ok()),
                None => Ok(None),
            }
        }

        fn replace<T: serde::Serialize + ?Sized>(
            &self,
            key: &str,
            value: &T,
        ) -> Result<(), StoreError> {
            let mut values = self.values.lock().unwrap();
            values.insert(
                key.to_string(),
                serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
            );
            Ok(())
        }

        fn append<T: serde::Serialize + ?Sized>(
            &self,
            _key: &str,
            _item: &T,
        ) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        entries: AtomicUsize,
        exits: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify_entry(&self, _trade: &Trade) -> Result<(), NotifyError> {
            self.entries.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn notify_exit(&self, _trade: &Trade) -> Result<(), NotifyError> {
            self.exits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn notify_high_score(&self, _signals: &[Signal]) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    fn fill_and_win_candles() -> Vec<Candle> {
        vec![
            Candle::new(3_600_000, 102.0, 103.0, 99.0, 102.0, 1_000.0),
            Candle::new(7_200_000, 108.0, 111.0, 101.0, 108.0, 1_000.0),
        ]
    }

    #[tokio::test]
    async fn test_process_registers_resolves_and_notifies() {
        let data = FakeData {
            candles: [("AAAUSDT".to_string(), fill_and_win_candles())].into(),
        };
        let tracker = Tracker::new(
            data,
            MemoryStore::default(),
            CountingNotifier::default(),
            AppConfig::default(),
        );

        let report = tracker.process(&[signal("AAAUSDT", 85.0)]).await.unwrap();

        assert_eq!(report.registered, 1);
        assert_eq!(report.filled, 1);
        assert_eq!(report.closed, 1);
        assert_eq!(report.open, 0);
        assert_eq!(tracker.notifier.entries.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.notifier.exits.load(Ordering::SeqCst), 1);

        let stored: Option<Vec<Trade>> = tracker.store.read(keys::TRADES).unwrap();
        let stored = stored.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].result, TradeResult::Win);
    }

    #[tokio::test]
    async fn test_unfetchable_symbol_stays_open() {
        let data = FakeData {
            candles: HashMap::new(),
        };
        let tracker = Tracker::new(
            data,
            MemoryStore::default(),
            CountingNotifier::default(),
            AppConfig::default(),
        );

        let report = tracker.process(&[signal("AAAUSDT", 85.0)]).await.unwrap();

        assert_eq!(report.registered, 1);
        assert_eq!(report.filled, 0);
        assert_eq!(report.open, 1);

        // The unresolved trade is persisted for the next pass
        let stored: Option<Vec<Trade>> = tracker.store.read(keys::TRADES).unwrap();
        assert!(stored.unwrap()[0].is_open());
    }
}
