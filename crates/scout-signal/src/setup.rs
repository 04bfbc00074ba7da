//! Trade setup construction: entry, stop and target placement.
//!
//! Entry candidates are tried in confluence order: a structural level
//! sitting on a Fibonacci retracement of the recent swing, then any
//! structural level on the correct side of price, then an ATR-offset
//! reversion fallback.

use scout_config::StrategyConfig;
use scout_core::{Candle, ConfluenceType, TradeSetup, TradeSide};
use scout_indicators::{swing_high, swing_levels, swing_low};

use crate::{SWING_RANGE_LOOKBACK, TARGET_LOOKBACK};

/// Structural level search windows, widest for weak trends.
const STRUCTURE_BASE_LOOKBACK: usize = 60;
const STRUCTURE_STRONG_LOOKBACK: usize = 45;
const STRUCTURE_EXTREME_LOOKBACK: usize = 30;

/// Relative distance treated as "at" a Fibonacci level or swing extreme.
const PROXIMITY_PCT: f64 = 0.05;

/// Minimum relative extension for a structural take-profit.
const MIN_TARGET_EXTENSION: f64 = 0.015;

/// Projection ratio for the fallback take-profit.
const TARGET_EXTENSION_RATIO: f64 = 0.618;

/// Entry offset in ATR units for the reversion fallback.
const ENTRY_ATR_OFFSET: f64 = 0.5;

/// Build a trade setup for the given side.
///
/// Returns None when ADX does not exceed the minimum trend-strength
/// threshold or the series is empty.
pub fn build_setup(
    candles: &[Candle],
    side: TradeSide,
    adx: f64,
    atr: f64,
    config: &StrategyConfig,
) -> Option<TradeSetup> {
    if adx <= config.thresholds.min_trend_adx {
        return None;
    }
    let price = candles.last()?.close;
    if price <= 0.0 {
        return None;
    }

    let range_high = swing_high(candles, SWING_RANGE_LOOKBACK);
    let range_low = swing_low(candles, SWING_RANGE_LOOKBACK);

    let fib_ratio = if config.adaptive && adx > config.thresholds.strong_adx {
        config.risk.fib_ratio_adaptive
    } else {
        config.risk.fib_ratio
    };
    let fib_level = match side {
        TradeSide::Long => range_high - fib_ratio * (range_high - range_low),
        TradeSide::Short => range_low + fib_ratio * (range_high - range_low),
    };

    let levels = structural_levels(candles, adx, config);
    let (entry, confluence) = select_entry(&levels, price, fib_level, side, atr);

    let opposing = match side {
        TradeSide::Long => range_low,
        TradeSide::Short => range_high,
    };
    let stop_loss = place_stop(entry, opposing, side, atr, config);
    let take_profit = place_target(candles, entry, opposing, side);

    let risk = (entry - stop_loss).abs();
    let reward = (take_profit - entry).abs();
    let risk_reward = if risk == 0.0 {
        0.0
    } else {
        (reward / risk * 100.0).round() / 100.0
    };

    Some(TradeSetup {
        entry,
        stop_loss,
        take_profit,
        risk_reward,
        side,
        confluence,
    })
}

/// Confirmed levels from a trend-strength-adjusted trailing window.
fn structural_levels(candles: &[Candle], adx: f64, config: &StrategyConfig) -> Vec<f64> {
    let lookback = if config.adaptive {
        if adx > config.thresholds.extreme_adx {
            STRUCTURE_EXTREME_LOOKBACK
        } else if adx > config.thresholds.strong_adx {
            STRUCTURE_STRONG_LOOKBACK
        } else {
            STRUCTURE_BASE_LOOKBACK
        }
    } else {
        STRUCTURE_BASE_LOOKBACK
    };
    let start = candles.len().saturating_sub(lookback);
    swing_levels(&candles[start..], config.indicators.swing_window)
}

fn select_entry(
    levels: &[f64],
    price: f64,
    fib_level: f64,
    side: TradeSide,
    atr: f64,
) -> (f64, ConfluenceType) {
    let correct_side = |level: f64| match side {
        TradeSide::Long => level < price,
        TradeSide::Short => level > price,
    };

    // Structural level sitting on the Fibonacci retracement, nearest wins
    if fib_level > 0.0 {
        let confluent = levels
            .iter()
            .copied()
            .filter(|&level| correct_side(level))
            .filter(|&level| ((level - fib_level) / fib_level).abs() <= PROXIMITY_PCT)
            .min_by(|a, b| (a - fib_level).abs().total_cmp(&(b - fib_level).abs()));
        if let Some(level) = confluent {
            return (level, ConfluenceType::FibStructure);
        }
    }

    // Any structural level on the correct side, nearest to price
    let nearest = levels
        .iter()
        .copied()
        .filter(|&level| correct_side(level))
        .min_by(|a, b| (a - price).abs().total_cmp(&(b - price).abs()));
    if let Some(level) = nearest {
        return (level, ConfluenceType::StructureOnly);
    }

    let entry = match side {
        TradeSide::Long => price - ENTRY_ATR_OFFSET * atr,
        TradeSide::Short => price + ENTRY_ATR_OFFSET * atr,
    };
    (entry, ConfluenceType::AtrReversion)
}

/// Structural stop past the opposing extreme when entering near it,
/// otherwise an ATR-multiple stop.
fn place_stop(entry: f64, opposing: f64, side: TradeSide, atr: f64, config: &StrategyConfig) -> f64 {
    let near_extreme = entry > 0.0 && ((entry - opposing) / entry).abs() <= PROXIMITY_PCT;
    match side {
        TradeSide::Long => {
            if near_extreme {
                opposing * (1.0 - config.risk.stop_loss_buffer)
            } else {
                entry - config.risk.atr_multiplier * atr
            }
        }
        TradeSide::Short => {
            if near_extreme {
                opposing * (1.0 + config.risk.stop_loss_buffer)
            } else {
                entry + config.risk.atr_multiplier * atr
            }
        }
    }
}

/// The long-window swing extreme when it clears the minimum extension,
/// otherwise a projection past the entry away from the opposing extreme.
fn place_target(candles: &[Candle], entry: f64, opposing: f64, side: TradeSide) -> f64 {
    match side {
        TradeSide::Long => {
            let extreme = swing_high(candles, TARGET_LOOKBACK);
            if entry > 0.0 && (extreme - entry) / entry >= MIN_TARGET_EXTENSION {
                extreme
            } else {
                entry + TARGET_EXTENSION_RATIO * (entry - opposing)
            }
        }
        TradeSide::Short => {
            let extreme = swing_low(candles, TARGET_LOOKBACK);
            if entry > 0.0 && (entry - extreme) / entry >= MIN_TARGET_EXTENSION {
                extreme
            } else {
                entry - TARGET_EXTENSION_RATIO * (opposing - entry)
            }
        }
    }
}
