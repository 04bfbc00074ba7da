//! Swing structure detection.
//!
//! Confirmed swing points anchor entry, stop and target placement in
//! the scoring engine. A pivot only counts once `window` candles on
//! each side have printed without breaching it.

use scout_core::{Candle, TradeSide};

use crate::simd::minmax_simd;

/// Minimum relative spacing between two kept structural levels.
const LEVEL_SPACING: f64 = 0.02;

/// Extract confirmed structural levels from a candle window.
///
/// A candle is a confirmed swing low (high) only if no candle within
/// `window` positions on either side has a lower low (higher high).
/// Ties are allowed. Consecutive detections closer than 2% collapse
/// into the first, the five most recent survive, and the result is
/// sorted ascending.
pub fn swing_levels(candles: &[Candle], window: usize) -> Vec<f64> {
    if window == 0 || candles.len() < 2 * window + 1 {
        return vec![];
    }

    let mut levels: Vec<f64> = Vec::new();

    for i in window..candles.len() - window {
        let neighborhood = &candles[i - window..=i + window];
        let low = candles[i].low;
        let high = candles[i].high;

        if neighborhood.iter().all(|c| c.low >= low) {
            push_level(&mut levels, low);
        }
        if neighborhood.iter().all(|c| c.high <= high) {
            push_level(&mut levels, high);
        }
    }

    // Keep the five most recently confirmed, presented ascending
    let mut kept = levels.split_off(levels.len().saturating_sub(5));
    kept.sort_by(f64::total_cmp);
    kept
}

fn push_level(levels: &mut Vec<f64>, level: f64) {
    if let Some(&prev) = levels.last() {
        if ((level - prev) / prev).abs() <= LEVEL_SPACING {
            return;
        }
    }
    levels.push(level);
}

/// Highest high over the trailing `lookback` candles. NaN when empty.
pub fn swing_high(candles: &[Candle], lookback: usize) -> f64 {
    let start = candles.len().saturating_sub(lookback);
    let highs: Vec<f64> = candles[start..].iter().map(|c| c.high).collect();
    match minmax_simd(&highs) {
        Some((_, max)) => max,
        None => f64::NAN,
    }
}

/// Lowest low over the trailing `lookback` candles. NaN when empty.
pub fn swing_low(candles: &[Candle], lookback: usize) -> f64 {
    let start = candles.len().saturating_sub(lookback);
    let lows: Vec<f64> = candles[start..].iter().map(|c| c.low).collect();
    match minmax_simd(&lows) {
        Some((min, _)) => min,
        None => f64::NAN,
    }
}

/// Classic pinbar rejection test.
///
/// True when the body is at most 40% of the candle's range and the
/// wick opposing the trade side exceeds both twice the body and the
/// wick on the trade side.
pub fn is_rejection(candle: &Candle, side: TradeSide) -> bool {
    let range = candle.range();
    if range <= 0.0 {
        return false;
    }

    let body = candle.body();
    if body > range * 0.4 {
        return false;
    }

    match side {
        TradeSide::Long => {
            candle.lower_wick() > body * 2.0 && candle.lower_wick() > candle.upper_wick()
        }
        TradeSide::Short => {
            candle.upper_wick() > body * 2.0 && candle.upper_wick() > candle.lower_wick()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_from(lows: &[f64], highs: &[f64]) -> Vec<Candle> {
        lows.iter()
            .zip(highs.iter())
            .enumerate()
            .map(|(i, (&low, &high))| {
                let mid = (low + high) / 2.0;
                Candle::new(i as i64 * 3600, mid, high, low, mid, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_swing_levels_confirmed_low() {
        let lows = [10.0, 9.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        // Strictly rising highs never confirm a swing high
        let highs = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0];
        let candles = candles_from(&lows, &highs);

        let levels = swing_levels(&candles, 2);
        assert_eq!(levels, vec![8.0]);
    }

    #[test]
    fn test_swing_levels_dedup_within_two_percent() {
        let lows = [10.0, 8.0, 10.0, 8.1, 10.0, 3.0, 10.0];
        let highs = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0];
        let candles = candles_from(&lows, &highs);

        // 8.1 sits within 2% of 8.0 and collapses into it
        let levels = swing_levels(&candles, 1);
        assert_eq!(levels, vec![3.0, 8.0]);
    }

    #[test]
    fn test_swing_levels_most_recent_five_ascending() {
        let mut lows = Vec::new();
        for v in [50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0] {
            lows.push(200.0);
            lows.push(v);
        }
        lows.push(200.0);
        let highs: Vec<f64> = (0..lows.len()).map(|i| 300.0 + i as f64).collect();
        let candles = candles_from(&lows, &highs);

        let levels = swing_levels(&candles, 1);
        assert_eq!(levels, vec![70.0, 80.0, 90.0, 100.0, 110.0]);
    }

    #[test]
    fn test_swing_levels_short_series() {
        let lows = [10.0, 9.0];
        let highs = [20.0, 21.0];
        let candles = candles_from(&lows, &highs);

        assert!(swing_levels(&candles, 2).is_empty());
    }

    #[test]
    fn test_swing_high_low() {
        let lows = [10.0, 8.0, 9.0, 11.0];
        let highs = [15.0, 14.0, 18.0, 16.0];
        let candles = candles_from(&lows, &highs);

        assert_eq!(swing_high(&candles, 4), 18.0);
        assert_eq!(swing_low(&candles, 4), 8.0);
        // Trailing window shorter than the series
        assert_eq!(swing_low(&candles, 2), 9.0);
    }

    #[test]
    fn test_swing_high_empty_is_nan() {
        assert!(swing_high(&[], 10).is_nan());
        assert!(swing_low(&[], 10).is_nan());
    }

    #[test]
    fn test_rejection_hammer() {
        // Long lower wick, small body near the top
        let hammer = Candle::new(0, 100.0, 101.0, 90.0, 100.5, 1000.0);

        assert!(is_rejection(&hammer, TradeSide::Long));
        assert!(!is_rejection(&hammer, TradeSide::Short));
    }

    #[test]
    fn test_rejection_shooting_star() {
        // Long upper wick, small body near the bottom
        let star = Candle::new(0, 100.0, 110.0, 99.5, 100.5, 1000.0);

        assert!(is_rejection(&star, TradeSide::Short));
        assert!(!is_rejection(&star, TradeSide::Long));
    }

    #[test]
    fn test_rejection_rejects_large_body() {
        // Body is most of the range
        let marubozu = Candle::new(0, 100.0, 110.0, 99.0, 109.0, 1000.0);

        assert!(!is_rejection(&marubozu, TradeSide::Long));
        assert!(!is_rejection(&marubozu, TradeSide::Short));
    }

    #[test]
    fn test_rejection_flat_candle() {
        let flat = Candle::new(0, 100.0, 100.0, 100.0, 100.0, 1000.0);
        assert!(!is_rejection(&flat, TradeSide::Long));
    }
}
