//! Configuration structures.

use scout_core::Interval;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl AppConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.batch_size == 0 {
            return Err(ConfigError::Invalid("scan.batch_size must be > 0".into()));
        }
        if self.scan.interval_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "scan.interval_minutes must be > 0".into(),
            ));
        }
        if self.scan.save_threshold > self.scan.trending_threshold {
            return Err(ConfigError::Invalid(
                "scan.save_threshold must not exceed scan.trending_threshold".into(),
            ));
        }
        self.strategy.validate()?;
        if !(0.0..=100.0).contains(&self.tracker.min_score) {
            return Err(ConfigError::Invalid(
                "tracker.min_score must be within [0, 100]".into(),
            ));
        }
        if self.tracker.fill_timeout_hours <= 0 {
            return Err(ConfigError::Invalid(
                "tracker.fill_timeout_hours must be > 0".into(),
            ));
        }
        self.optimizer.validate()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Market data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Exchange REST endpoint.
    pub base_url: String,
    /// Quote asset used to build the scan universe.
    pub quote_asset: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Candle cache time-to-live in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            quote_asset: "USDT".to_string(),
            timeout_secs: 10,
            cache_ttl_secs: 60,
        }
    }
}

/// Scan orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of top-volume pairs to scan each cycle.
    pub symbols: usize,
    /// Symbols scored concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches, in milliseconds.
    pub batch_pause_ms: u64,
    /// Higher timeframe for trend bias.
    pub htf: Interval,
    /// Lower timeframe for entry timing.
    pub ltf: Interval,
    /// Candles fetched per timeframe.
    pub candle_limit: usize,
    /// Signals persisted per cycle.
    pub top_signals: usize,
    /// Minimum score carried forward in consistency state.
    pub save_threshold: f64,
    /// Score treated as an active opportunity.
    pub trending_threshold: f64,
    /// Score appended to the audit log and pushed to notifiers.
    pub audit_threshold: f64,
    /// Cadence between scan cycles, in minutes.
    pub interval_minutes: i64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            symbols: 100,
            batch_size: 5,
            batch_pause_ms: 1500,
            htf: Interval::Hour4,
            ltf: Interval::Hour1,
            candle_limit: 300,
            top_signals: 20,
            save_threshold: 55.0,
            trending_threshold: 65.0,
            audit_threshold: 80.0,
            interval_minutes: 60,
        }
    }
}

/// Scoring engine parameters.
///
/// Threaded as an immutable value through every scoring call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Regime-aware mode: adjusts Fibonacci ratio, structural lookback
    /// and sub-score multipliers with trend strength.
    pub adaptive: bool,
    pub indicators: IndicatorConfig,
    pub thresholds: ThresholdConfig,
    pub pullback: PullbackConfig,
    pub weights: ScoringWeights,
    pub regime: RegimeMultipliers,
    pub risk: RiskConfig,
    pub liquidity: LiquidityConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            adaptive: true,
            indicators: IndicatorConfig::default(),
            thresholds: ThresholdConfig::default(),
            pullback: PullbackConfig::default(),
            weights: ScoringWeights::default(),
            regime: RegimeMultipliers::default(),
            risk: RiskConfig::default(),
            liquidity: LiquidityConfig::default(),
        }
    }
}

impl StrategyConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        if ind.ema_fast == 0 || ind.ema_slow == 0 || ind.rsi == 0 || ind.adx == 0 || ind.atr == 0 {
            return Err(ConfigError::Invalid(
                "strategy.indicators periods must be > 0".into(),
            ));
        }
        if ind.ema_fast >= ind.ema_slow {
            return Err(ConfigError::Invalid(
                "strategy.indicators.ema_fast must be below ema_slow".into(),
            ));
        }
        if ind.bollinger < 2 {
            return Err(ConfigError::Invalid(
                "strategy.indicators.bollinger must be > 1".into(),
            ));
        }
        if self.pullback.min_depth >= self.pullback.max_depth
            || self.pullback.min_depth < 0.0
            || self.pullback.max_depth > 1.0
        {
            return Err(ConfigError::Invalid(
                "strategy.pullback band must satisfy 0 <= min < max <= 1".into(),
            ));
        }
        if self.thresholds.rsi_min >= self.thresholds.rsi_max {
            return Err(ConfigError::Invalid(
                "strategy.thresholds.rsi_min must be below rsi_max".into(),
            ));
        }
        if self.risk.atr_multiplier <= 0.0 {
            return Err(ConfigError::Invalid(
                "strategy.risk.atr_multiplier must be > 0".into(),
            ));
        }
        if self.risk.stop_loss_buffer < 0.0 {
            return Err(ConfigError::Invalid(
                "strategy.risk.stop_loss_buffer must be >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Indicator periods and parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi: usize,
    pub adx: usize,
    pub atr: usize,
    pub bollinger: usize,
    pub bollinger_std_dev: f64,
    /// Candles on each side required to confirm a swing point.
    pub swing_window: usize,
    /// How far back the divergence pivot scan may walk.
    pub divergence_lookback: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_fast: 50,
            ema_slow: 200,
            rsi: 14,
            adx: 14,
            atr: 14,
            bollinger: 20,
            bollinger_std_dev: 2.0,
            swing_window: 5,
            divergence_lookback: 30,
        }
    }
}

/// Classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// ADX below this forces score 0 and suppresses setups.
    pub min_trend_adx: f64,
    /// ADX above this marks a strongly trending regime.
    pub strong_adx: f64,
    /// ADX above this narrows the structural search to its tightest window.
    pub extreme_adx: f64,
    /// Acceptable RSI band for momentum confirmation.
    pub rsi_min: f64,
    pub rsi_max: f64,
    /// Minimum normalized OBV-price imbalance to call money flow directional.
    pub flow_threshold: f64,
    /// ATR/price ratio above this is penalized as excess volatility.
    pub max_atr_ratio: f64,
    /// Risk:reward below this is penalized in the structure sub-score.
    pub min_risk_reward: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_trend_adx: 20.0,
            strong_adx: 25.0,
            extreme_adx: 50.0,
            rsi_min: 35.0,
            rsi_max: 70.0,
            flow_threshold: 0.25,
            max_atr_ratio: 0.05,
            min_risk_reward: 1.5,
        }
    }
}

/// Pullback acceptance band, as retracement depth fractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PullbackConfig {
    pub min_depth: f64,
    pub max_depth: f64,
}

impl Default for PullbackConfig {
    fn default() -> Self {
        Self {
            min_depth: 0.3,
            max_depth: 0.7,
        }
    }
}

/// Sub-score weights, penalties and bonuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub trend_base: f64,
    pub trend_adx_bonus: f64,
    /// Awarded when a setup direction exists without full EMA alignment.
    pub trend_weak_bias: f64,
    pub structure_fib: f64,
    pub structure_level: f64,
    pub structure_atr: f64,
    pub flow: f64,
    pub timing_pullback: f64,
    pub timing_rejection: f64,
    pub penalty_no_contraction: f64,
    pub penalty_flow_disagree: f64,
    pub penalty_divergence_disagree: f64,
    pub penalty_overextension: f64,
    pub penalty_excess_atr: f64,
    pub penalty_low_rr: f64,
    pub bonus_liquidity: f64,
    pub bonus_small_cap: f64,
    pub bonus_mega_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            trend_base: 20.0,
            trend_adx_bonus: 10.0,
            trend_weak_bias: 8.0,
            structure_fib: 25.0,
            structure_level: 18.0,
            structure_atr: 10.0,
            flow: 15.0,
            timing_pullback: 15.0,
            timing_rejection: 10.0,
            penalty_no_contraction: 5.0,
            penalty_flow_disagree: 10.0,
            penalty_divergence_disagree: 10.0,
            penalty_overextension: 10.0,
            penalty_excess_atr: 8.0,
            penalty_low_rr: 8.0,
            bonus_liquidity: 5.0,
            bonus_small_cap: 5.0,
            bonus_mega_cap: 3.0,
        }
    }
}

/// Sub-score multipliers applied when ADX exceeds the strong threshold
/// in adaptive mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeMultipliers {
    pub trend: f64,
    pub structure: f64,
    pub timing: f64,
}

impl Default for RegimeMultipliers {
    fn default() -> Self {
        Self {
            trend: 1.2,
            structure: 1.15,
            timing: 0.85,
        }
    }
}

/// Stop and entry placement parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Stop distance in ATR units when no structural stop applies.
    pub atr_multiplier: f64,
    /// Relative offset past a swing extreme when placing a structural stop.
    pub stop_loss_buffer: f64,
    /// Fibonacci retracement ratio for entry confluence.
    pub fib_ratio: f64,
    /// Ratio substituted in adaptive mode when the trend is strong.
    pub fib_ratio_adaptive: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            atr_multiplier: 1.5,
            stop_loss_buffer: 0.005,
            fib_ratio: 0.618,
            fib_ratio_adaptive: 0.382,
        }
    }
}

/// Liquidity and market-cap bonus thresholds, in quote currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityConfig {
    /// Minimum 24h notional volume for the liquidity bonus.
    pub min_notional_24h: f64,
    /// Market-cap floor below which the liquidity bonus is withheld.
    pub min_market_cap: f64,
    /// Upper bound of the small-cap bonus class.
    pub small_cap_max: f64,
    /// Lower bound of the mega-cap bonus class.
    pub mega_cap_min: f64,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self {
            min_notional_24h: 10_000_000.0,
            min_market_cap: 50_000_000.0,
            small_cap_max: 500_000_000.0,
            mega_cap_min: 10_000_000_000.0,
        }
    }
}

/// Forward-test ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum signal score to open a paper trade.
    pub min_score: f64,
    /// Hours an unfilled trade may wait before expiring.
    pub fill_timeout_hours: i64,
    /// Close a filled trade at market after this many candles. None disables.
    pub time_stop_candles: Option<usize>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_score: 70.0,
            fill_timeout_hours: 72,
            time_stop_candles: Some(48),
        }
    }
}

/// Parameter search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Symbols per grid-point backtest.
    pub sample_limit: usize,
    /// Historical days per grid-point backtest.
    pub sample_days: i64,
    /// Symbols for deep validation of the winner and baseline.
    pub full_limit: usize,
    /// Historical days for deep validation.
    pub full_days: i64,
    pub min_scores: Vec<f64>,
    pub atr_multipliers: Vec<f64>,
    pub stop_loss_buffers: Vec<f64>,
    pub rsi_periods: Vec<usize>,
    pub adx_thresholds: Vec<f64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            sample_limit: 25,
            sample_days: 30,
            full_limit: 50,
            full_days: 90,
            min_scores: vec![60.0, 65.0, 70.0],
            atr_multipliers: vec![1.0, 1.5, 2.0],
            stop_loss_buffers: vec![0.002, 0.005],
            rsi_periods: vec![10, 14],
            adx_thresholds: vec![20.0, 25.0],
        }
    }
}

impl OptimizerConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_limit == 0 || self.sample_days <= 0 {
            return Err(ConfigError::Invalid(
                "optimizer sample bounds must be positive".into(),
            ));
        }
        if self.full_days < self.sample_days {
            return Err(ConfigError::Invalid(
                "optimizer.full_days must be at least sample_days".into(),
            ));
        }
        if self.min_scores.is_empty()
            || self.atr_multipliers.is_empty()
            || self.stop_loss_buffers.is_empty()
            || self.rsi_periods.is_empty()
            || self.adx_thresholds.is_empty()
        {
            return Err(ConfigError::Invalid(
                "optimizer grid axes must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Snapshot store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding persisted state files.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "data".to_string(),
        }
    }
}

/// Outbound notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotifyConfig {
    /// Optional webhook receiving entry/exit/high-score events.
    pub webhook_url: Option<String>,
}
