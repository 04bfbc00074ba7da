//! Higher-timeframe trend classification.
//!
//! Bias comes from EMA stack alignment: LONG only while the close
//! sits above the fast EMA and the fast EMA above the slow, SHORT on
//! the mirror. Anything else is NONE, or UNKNOWN when history is too
//! short to define both EMAs.

use scout_config::StrategyConfig;
use scout_core::traits::{CandleIndicator, Indicator};
use scout_core::{Candle, TrendBias, TrendContext, TrendStructure};
use scout_indicators::{Adx, Ema};

/// Classify trend bias, structure and strength for a candle series.
pub fn trend_context(candles: &[Candle], config: &StrategyConfig) -> TrendContext {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let fast = last_defined(&Ema::new(config.indicators.ema_fast).calculate(&closes));
    let slow = last_defined(&Ema::new(config.indicators.ema_slow).calculate(&closes));
    let adx = Adx::new(config.indicators.adx)
        .calculate(candles)
        .last()
        .copied()
        .unwrap_or(0.0);

    let close = closes.last().copied().unwrap_or(0.0);

    let bias = match (fast, slow) {
        (Some(fast), Some(slow)) => {
            if close > fast && fast > slow {
                TrendBias::Long
            } else if close < fast && fast < slow {
                TrendBias::Short
            } else {
                TrendBias::None
            }
        }
        _ => TrendBias::Unknown,
    };

    // Latest close against the close three candles back
    let structure = if candles.len() >= 4 && close > candles[candles.len() - 4].close {
        TrendStructure::Up
    } else {
        TrendStructure::Down
    };

    TrendContext {
        bias,
        structure,
        ema_fast: fast.unwrap_or(0.0),
        ema_slow: slow.unwrap_or(0.0),
        adx,
    }
}

fn last_defined(values: &[f64]) -> Option<f64> {
    values.last().copied().filter(|v| !v.is_nan())
}
