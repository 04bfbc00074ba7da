//! Parameter grid construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use scout_config::{AppConfig, OptimizerConfig};

/// One combination of tunable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamPoint {
    /// Registration threshold for paper trades.
    pub min_score: f64,
    /// Stop distance in ATR units.
    pub atr_multiplier: f64,
    /// Structural stop offset past the swing extreme.
    pub stop_loss_buffer: f64,
    /// RSI period.
    pub rsi_period: usize,
    /// ADX level treated as a strong trend.
    pub strong_adx: f64,
}

impl ParamPoint {
    /// Clone the base configuration with this point's parameters applied.
    pub fn apply(&self, base: &AppConfig) -> AppConfig {
        let mut config = base.clone();
        config.tracker.min_score = self.min_score;
        config.strategy.risk.atr_multiplier = self.atr_multiplier;
        config.strategy.risk.stop_loss_buffer = self.stop_loss_buffer;
        config.strategy.indicators.rsi = self.rsi_period;
        config.strategy.thresholds.strong_adx = self.strong_adx;
        config
    }
}

impl fmt::Display for ParamPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min_score={} atr={} sl_buffer={} rsi={} strong_adx={}",
            self.min_score, self.atr_multiplier, self.stop_loss_buffer, self.rsi_period,
            self.strong_adx
        )
    }
}

/// The full cartesian product of the configured parameter axes, in a
/// fixed nesting order so runs are reproducible.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    points: Vec<ParamPoint>,
}

impl ParamGrid {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        let mut points = Vec::new();
        for &min_score in &config.min_scores {
            for &atr_multiplier in &config.atr_multipliers {
                for &stop_loss_buffer in &config.stop_loss_buffers {
                    for &rsi_period in &config.rsi_periods {
                        for &strong_adx in &config.adx_thresholds {
                            points.push(ParamPoint {
                                min_score,
                                atr_multiplier,
                                stop_loss_buffer,
                                rsi_period,
                                strong_adx,
                            });
                        }
                    }
                }
            }
        }
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamPoint> {
        self.points.iter()
    }
}
