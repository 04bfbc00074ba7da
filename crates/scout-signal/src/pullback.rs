//! Pullback depth and rejection detection.

use scout_config::StrategyConfig;
use scout_core::{Candle, PullbackContext, TradeSide};
use scout_indicators::{is_rejection, swing_high, swing_low};

use crate::SWING_RANGE_LOOKBACK;

/// Measure how far the latest close has retraced into the recent
/// swing range, direction-adjusted for the trade side.
///
/// Depth 0 means price sits at the range extreme in the trade
/// direction, 1 at the opposing extreme. A degenerate range yields
/// the neutral default.
pub fn pullback_context(
    candles: &[Candle],
    side: TradeSide,
    config: &StrategyConfig,
) -> PullbackContext {
    let Some(last) = candles.last() else {
        return PullbackContext::default();
    };

    let high = swing_high(candles, SWING_RANGE_LOOKBACK);
    let low = swing_low(candles, SWING_RANGE_LOOKBACK);
    let range = high - low;
    if !range.is_finite() || range <= 0.0 {
        return PullbackContext::default();
    }

    let depth = match side {
        TradeSide::Long => (high - last.close) / range,
        TradeSide::Short => (last.close - low) / range,
    };
    let depth = depth.clamp(0.0, 1.0);

    PullbackContext {
        is_pullback: depth >= config.pullback.min_depth && depth <= config.pullback.max_depth,
        depth,
        has_rejection: is_rejection(last, side),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_with_final_close(close: f64) -> Vec<Candle> {
        // Range spans lows near 90 up to highs near 110
        let mut candles: Vec<Candle> = (0..30)
            .map(|i| {
                let mid = 100.0 + (i as f64 * 0.7).sin() * 8.0;
                Candle::new(i as i64 * 3600, mid, mid + 2.0, mid - 2.0, mid, 1000.0)
            })
            .collect();
        candles.push(Candle::new(
            30 * 3600,
            close,
            close + 0.1,
            close - 0.1,
            close,
            1000.0,
        ));
        candles
    }

    #[test]
    fn test_long_depth_grows_as_price_falls() {
        let config = StrategyConfig::default();

        let shallow = pullback_context(&candles_with_final_close(108.0), TradeSide::Long, &config);
        let deep = pullback_context(&candles_with_final_close(92.0), TradeSide::Long, &config);

        assert!(deep.depth > shallow.depth);
    }

    #[test]
    fn test_mid_range_close_is_pullback() {
        let config = StrategyConfig::default();
        let context = pullback_context(&candles_with_final_close(100.0), TradeSide::Long, &config);

        assert!(context.depth > 0.3 && context.depth < 0.7);
        assert!(context.is_pullback);
    }

    #[test]
    fn test_depth_is_side_symmetric() {
        let config = StrategyConfig::default();
        let candles = candles_with_final_close(100.0);

        let long = pullback_context(&candles, TradeSide::Long, &config);
        let short = pullback_context(&candles, TradeSide::Short, &config);

        assert!((long.depth + short.depth - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_flat_range_degrades_to_default() {
        let config = StrategyConfig::default();
        let candles: Vec<Candle> = (0..20)
            .map(|i| Candle::new(i as i64 * 3600, 100.0, 100.0, 100.0, 100.0, 1000.0))
            .collect();

        let context = pullback_context(&candles, TradeSide::Long, &config);
        assert!(!context.is_pullback);
        assert_eq!(context.depth, 0.0);
    }

    #[test]
    fn test_empty_series_degrades_to_default() {
        let config = StrategyConfig::default();
        let context = pullback_context(&[], TradeSide::Long, &config);

        assert!(!context.is_pullback);
        assert!(!context.has_rejection);
    }
}
