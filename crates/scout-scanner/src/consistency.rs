//! Cross-cycle consistency merge.
//!
//! Each cycle folds its fresh signals into the previous cycle's
//! [`ConsistencyMap`], producing the snapshot to carry forward plus a
//! per-symbol streak status for reporting. The merge is pure; the
//! scanner owns reading and replacing the persisted snapshot.

use std::collections::HashMap;

use scout_config::ScanConfig;
use scout_core::{ConsistencyMap, ConsistencyRecord, ConsistencyStatus, Signal};

/// Hysteresis band around the previous score, in score points.
const STABILITY_BAND: f64 = 5.0;
/// A record older than this many scan intervals no longer continues a
/// streak; the symbol starts over as new.
const STREAK_WINDOW_INTERVALS: i64 = 3;

/// Result of folding one cycle's signals into the carried state.
#[derive(Debug, Default)]
pub struct ConsistencyOutcome {
    /// Snapshot to persist for the next cycle. Holds exactly the symbols
    /// that cleared the save threshold this cycle.
    pub records: ConsistencyMap,
    /// Streak status per qualifying symbol, for this cycle's report.
    pub statuses: HashMap<String, ConsistencyStatus>,
}

/// Fold a cycle's signals into the prior consistency state.
///
/// Streaks only advance while the score stays above the trending
/// threshold. A score that slips into the save band keeps its streak
/// frozen at the current count; only dropping below the save threshold
/// (or going stale) loses it.
pub fn merge_consistency(
    prior: &ConsistencyMap,
    signals: &[Signal],
    config: &ScanConfig,
    now_ms: i64,
) -> ConsistencyOutcome {
    let mut outcome = ConsistencyOutcome::default();
    let window_ms = config.interval_minutes * 60_000 * STREAK_WINDOW_INTERVALS;

    for signal in signals {
        if signal.score < config.save_threshold {
            continue;
        }

        let recent_prior = prior
            .get(&signal.symbol)
            .filter(|r| now_ms - r.timestamp <= window_ms);

        let (record, status) = match recent_prior {
            Some(prev) => {
                let streak = if signal.score > config.trending_threshold {
                    prev.consecutive_scans + 1
                } else {
                    prev.consecutive_scans
                };
                let delta = signal.score - prev.score;
                let status = if delta > STABILITY_BAND {
                    ConsistencyStatus::Strengthening
                } else if delta < -STABILITY_BAND {
                    ConsistencyStatus::Weakening
                } else {
                    ConsistencyStatus::Stable
                };
                (
                    ConsistencyRecord {
                        score: signal.score,
                        timestamp: now_ms,
                        consecutive_scans: streak,
                    },
                    status,
                )
            }
            None => (
                ConsistencyRecord {
                    score: signal.score,
                    timestamp: now_ms,
                    consecutive_scans: 1,
                },
                ConsistencyStatus::New,
            ),
        };

        outcome.records.insert(signal.symbol.clone(), record);
        outcome.statuses.insert(signal.symbol.clone(), status);
    }

    outcome
}
