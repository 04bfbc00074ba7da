//! Trade outcome resolution.
//!
//! Replays candles newer than the trade's signal through the lifecycle
//! state machine. Pure and synchronous so the forward tracker and the
//! backtest engine resolve outcomes identically.

use scout_config::TrackerConfig;
use scout_core::{Candle, Interval, Trade, TradeResult, TradeSide};

/// Replay `candles` through an open trade, mutating it in place.
///
/// Candles at or before the signal timestamp are skipped; the replay
/// stops at the first candle that closes the trade. Already-closed
/// trades are left untouched.
pub fn resolve_trade(
    trade: &mut Trade,
    candles: &[Candle],
    interval: Interval,
    config: &TrackerConfig,
) {
    if !trade.is_open() {
        return;
    }

    let signal_time = trade.signal_time;
    for candle in candles.iter().filter(|c| c.time > signal_time) {
        if trade.is_filled {
            resolve_filled(trade, candle, interval, config);
        } else {
            resolve_unfilled(trade, candle, config);
        }
        if !trade.is_open() {
            break;
        }
    }
}

/// Pre-fill phase: expiry, invalidation, or entry touch.
fn resolve_unfilled(trade: &mut Trade, candle: &Candle, config: &TrackerConfig) {
    let age_ms = candle.time - trade.signal_time;
    if age_ms > config.fill_timeout_hours * 3_600_000 {
        trade.close(TradeResult::Expired, None, candle.time, 0.0);
        return;
    }

    // Stop traded before entry ever did. When one candle spans both,
    // the stop takes precedence since the intra-candle order is unknown.
    let stopped = match trade.side {
        TradeSide::Long => candle.low <= trade.stop_loss,
        TradeSide::Short => candle.high >= trade.stop_loss,
    };
    if stopped {
        trade.close(TradeResult::Invalidated, None, candle.time, 0.0);
        return;
    }

    let entered = match trade.side {
        TradeSide::Long => candle.low <= trade.entry_price,
        TradeSide::Short => candle.high >= trade.entry_price,
    };
    if entered {
        // No outcome on the fill candle; resolution starts next candle
        trade.fill(candle.time);
    }
}

/// Post-fill phase: stop and target exits, with an optional time stop.
/// A stop or target touched on the time-stop candle overrides the
/// time-based result.
fn resolve_filled(trade: &mut Trade, candle: &Candle, interval: Interval, config: &TrackerConfig) {
    let time_result = match (config.time_stop_candles, trade.fill_time) {
        (Some(max_candles), Some(fill_time))
            if candle.time - fill_time > max_candles as i64 * interval.as_millis() =>
        {
            let pnl = trade.pnl_at(candle.close);
            let result = if pnl >= 0.0 {
                TradeResult::Win
            } else {
                TradeResult::Loss
            };
            Some((result, candle.close, pnl))
        }
        _ => None,
    };

    let (hit_stop, hit_target) = match trade.side {
        TradeSide::Long => (
            candle.low <= trade.stop_loss,
            candle.high >= trade.take_profit,
        ),
        TradeSide::Short => (
            candle.high >= trade.stop_loss,
            candle.low <= trade.take_profit,
        ),
    };

    if hit_stop {
        let pnl = trade.pnl_at(trade.stop_loss);
        trade.close(TradeResult::Loss, Some(trade.stop_loss), candle.time, pnl);
    } else if hit_target {
        let pnl = trade.pnl_at(trade.take_profit);
        trade.close(TradeResult::Win, Some(trade.take_profit), candle.time, pnl);
    } else if let Some((result, price, pnl)) = time_result {
        trade.close(result, Some(price), candle.time, pnl);
    }
}
