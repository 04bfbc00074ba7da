//! Grid search and deep validation.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use scout_backtest::{BacktestOptions, BacktestRunner, BacktestStats};
use scout_config::{AppConfig, OptimizerConfig};
use scout_core::{ScoutError, ScoutResult};

use crate::grid::{ParamGrid, ParamPoint};

/// Share of the progress bar consumed by the grid phase; the remainder
/// is reserved for deep validation.
const GRID_PROGRESS_CEILING: f64 = 90.0;

/// One evaluated grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationPoint {
    pub params: ParamPoint,
    pub stats: BacktestStats,
}

/// Search result: the deep-validated winner, the deep-validated
/// baseline it must beat, and the sample ranking it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// Winning point, re-evaluated over the full sample
    pub best: OptimizationPoint,
    /// Unmodified base configuration over the full sample
    pub baseline: BacktestStats,
    /// All grid points with sample stats, best first
    pub ranked: Vec<OptimizationPoint>,
}

/// Progress snapshot passed to the optional callback.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    /// Grid points evaluated so far
    pub completed: usize,
    /// Total grid points
    pub total: usize,
    /// Overall percentage, grid capped at 90
    pub percent: f64,
    /// Estimated time remaining, from mean per-point elapsed time
    pub eta: Option<Duration>,
}

/// Parameter optimizer over a backtest runner.
pub struct Optimizer<R> {
    runner: R,
    config: OptimizerConfig,
    progress: Option<Box<dyn Fn(Progress) + Send + Sync>>,
}

impl<R: BacktestRunner> Optimizer<R> {
    pub fn new(runner: R, config: OptimizerConfig) -> Self {
        Self {
            runner,
            config,
            progress: None,
        }
    }

    /// Install a progress callback, invoked after every grid point and
    /// each deep-validation run.
    pub fn with_progress(mut self, callback: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Run the full search: evaluate every grid point over the sample
    /// bounds, rank by win rate then net wins, then re-evaluate the
    /// winner and the baseline over the full bounds.
    pub async fn run(&self, base: &AppConfig) -> ScoutResult<OptimizationOutcome> {
        let grid = ParamGrid::from_config(&self.config);
        if grid.is_empty() {
            return Err(ScoutError::Validation(
                "optimizer grid is empty".to_string(),
            ));
        }

        let sample = BacktestOptions {
            limit: self.config.sample_limit,
            days: self.config.sample_days,
        };
        let total = grid.len();
        info!(points = total, "grid search started");

        let started = Instant::now();
        let mut ranked: Vec<OptimizationPoint> = Vec::with_capacity(total);
        for (i, point) in grid.iter().enumerate() {
            let config = point.apply(base);
            match self.runner.run_backtest(&config, &sample).await {
                Ok(stats) => {
                    info!(
                        point = %point,
                        win_rate = stats.win_rate_pct,
                        net_wins = stats.net_wins(),
                        "grid point evaluated"
                    );
                    ranked.push(OptimizationPoint {
                        params: *point,
                        stats,
                    });
                }
                Err(e) => {
                    warn!(point = %point, error = %e, "grid point failed, skipping");
                }
            }
            self.report(grid_progress(i + 1, total, started.elapsed()));
        }

        if ranked.is_empty() {
            return Err(ScoutError::Validation(
                "no grid point produced a result".to_string(),
            ));
        }

        // Stable sort keeps grid order for full ties, so identical
        // inputs always elect the same winner
        ranked.sort_by(|a, b| {
            b.stats
                .win_rate_pct
                .total_cmp(&a.stats.win_rate_pct)
                .then_with(|| b.stats.net_wins().cmp(&a.stats.net_wins()))
        });

        let full = BacktestOptions {
            limit: self.config.full_limit,
            days: self.config.full_days,
        };
        let winner = ranked[0].params;
        info!(point = %winner, "deep validating winner");
        let best_stats = self.runner.run_backtest(&winner.apply(base), &full).await?;
        self.report(Progress {
            completed: total,
            total,
            percent: 95.0,
            eta: None,
        });

        info!("deep validating baseline");
        let baseline = self.runner.run_backtest(base, &full).await?;
        self.report(Progress {
            completed: total,
            total,
            percent: 100.0,
            eta: None,
        });

        Ok(OptimizationOutcome {
            best: OptimizationPoint {
                params: winner,
                stats: best_stats,
            },
            baseline,
            ranked,
        })
    }

    fn report(&self, progress: Progress) {
        if let Some(callback) = &self.progress {
            callback(progress);
        }
    }
}

fn grid_progress(completed: usize, total: usize, elapsed: Duration) -> Progress {
    let percent = (completed as f64 / total as f64 * GRID_PROGRESS_CEILING)
        .min(GRID_PROGRESS_CEILING);
    let eta = if completed > 0 {
        let mean = elapsed / completed as u32;
        Some(mean * (total - completed) as u32)
    } else {
        None
    };
    Progress {
        completed,
        total,
        percent,
        eta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Deterministic stand-in for a real backtest: win rate follows the
    /// registration threshold, net wins follow the ADX threshold, and
    /// deep runs score one point higher than sample runs.
    struct CannedRunner {
        calls: AtomicUsize,
        full_options: Mutex<Vec<BacktestOptions>>,
    }

    impl CannedRunner {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                full_options: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BacktestRunner for CannedRunner {
        async fn run_backtest(
            &self,
            config: &AppConfig,
            options: &BacktestOptions,
        ) -> ScoutResult<BacktestStats> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let deep = options.days >= 90;
            if deep {
                self.full_options.lock().unwrap().push(*options);
            }

            let mut stats = BacktestStats::new();
            stats.wins = config.strategy.thresholds.strong_adx as usize;
            stats.losses = 0;
            stats.win_rate_pct = config.tracker.min_score + if deep { 1.0 } else { 0.0 };
            Ok(stats)
        }
    }

    fn optimizer_config() -> OptimizerConfig {
        OptimizerConfig {
            min_scores: vec![60.0, 70.0],
            atr_multipliers: vec![1.0],
            stop_loss_buffers: vec![0.005],
            rsi_periods: vec![14],
            adx_thresholds: vec![20.0, 25.0],
            ..OptimizerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_ranking_by_win_rate_then_net_wins() {
        let optimizer = Optimizer::new(CannedRunner::new(), optimizer_config());
        let outcome = optimizer.run(&AppConfig::default()).await.unwrap();

        // Both min_score=70 points tie on win rate; adx=25 has more wins
        assert_eq!(outcome.best.params.min_score, 70.0);
        assert_eq!(outcome.best.params.strong_adx, 25.0);
        assert_eq!(outcome.ranked.len(), 4);
        assert_eq!(outcome.ranked[0].params.strong_adx, 25.0);
        assert_eq!(outcome.ranked[1].params.strong_adx, 20.0);
    }

    #[tokio::test]
    async fn test_deep_validation_replaces_sample_stats() {
        let optimizer = Optimizer::new(CannedRunner::new(), optimizer_config());
        let outcome = optimizer.run(&AppConfig::default()).await.unwrap();

        // Sample ranking kept the sample figure, the winner was re-run deep
        assert_eq!(outcome.ranked[0].stats.win_rate_pct, 70.0);
        assert_eq!(outcome.best.stats.win_rate_pct, 71.0);
        // Baseline uses the unmodified config (default min_score 70)
        assert_eq!(outcome.baseline.win_rate_pct, 71.0);
    }

    #[tokio::test]
    async fn test_deep_runs_use_full_bounds() {
        let runner = CannedRunner::new();
        let optimizer = Optimizer::new(runner, optimizer_config());
        let outcome = optimizer.run(&AppConfig::default()).await;
        assert!(outcome.is_ok());

        let full = optimizer.runner.full_options.lock().unwrap();
        assert_eq!(full.len(), 2);
        assert!(full.iter().all(|o| o.limit == 50 && o.days == 90));
        // 4 grid points + 2 deep runs
        assert_eq!(optimizer.runner.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_search_is_deterministic() {
        let first = Optimizer::new(CannedRunner::new(), optimizer_config())
            .run(&AppConfig::default())
            .await
            .unwrap();
        let second = Optimizer::new(CannedRunner::new(), optimizer_config())
            .run(&AppConfig::default())
            .await
            .unwrap();

        assert_eq!(first.best.params, second.best.params);
        let order_a: Vec<f64> = first.ranked.iter().map(|p| p.params.strong_adx).collect();
        let order_b: Vec<f64> = second.ranked.iter().map(|p| p.params.strong_adx).collect();
        assert_eq!(order_a, order_b);
    }

    #[tokio::test]
    async fn test_progress_grid_capped_then_completes() {
        let seen: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let optimizer = Optimizer::new(CannedRunner::new(), optimizer_config())
            .with_progress(move |p| sink.lock().unwrap().push(p.percent));

        optimizer.run(&AppConfig::default()).await.unwrap();

        let percents = seen.lock().unwrap();
        // 4 grid reports then the two deep-validation reports
        assert_eq!(percents.len(), 6);
        assert!(percents[..4].iter().all(|&p| p <= 90.0));
        assert_eq!(percents[3], 90.0);
        assert_eq!(percents[4], 95.0);
        assert_eq!(percents[5], 100.0);
    }

    #[tokio::test]
    async fn test_empty_grid_is_rejected() {
        let config = OptimizerConfig {
            min_scores: Vec::new(),
            ..optimizer_config()
        };
        let optimizer = Optimizer::new(CannedRunner::new(), config);

        let outcome = optimizer.run(&AppConfig::default()).await;
        assert!(outcome.is_err());
    }
}
