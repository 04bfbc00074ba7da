//! Momentum confirmation and RSI divergence.

use scout_config::StrategyConfig;
use scout_core::traits::Indicator;
use scout_core::{Candle, Divergence, MomentumContext};
use scout_indicators::Rsi;

/// Evaluate RSI band membership and scan for divergence.
pub fn momentum_context(candles: &[Candle], config: &StrategyConfig) -> MomentumContext {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let rsi_series = Rsi::new(config.indicators.rsi).calculate(&closes);

    let rsi = rsi_series
        .last()
        .copied()
        .filter(|v| !v.is_nan())
        .unwrap_or(50.0);

    MomentumContext {
        rsi,
        divergence: scan_divergence(&closes, &rsi_series, config.indicators.divergence_lookback),
        momentum_ok: rsi >= config.thresholds.rsi_min && rsi <= config.thresholds.rsi_max,
    }
}

/// Two-pivot divergence scan.
///
/// Walks backward from the next-to-last candle and stops at the first
/// two confirmed price pivots it meets. The stop-at-two behavior is a
/// deliberate recency bias: older, possibly cleaner pivots must not
/// displace recent ones. Bullish is checked first and only one
/// direction is ever reported.
pub fn scan_divergence(closes: &[f64], rsi: &[f64], lookback: usize) -> Divergence {
    if closes.len() < 5 || rsi.len() != closes.len() {
        return Divergence::None;
    }

    let end = closes.len() - 2;
    let start = closes.len().saturating_sub(lookback);

    // Bullish: lower low in price, higher low in RSI, older pivot oversold-side
    if let Some((recent, older)) = two_pivots(closes, start, end, false) {
        if !rsi[recent].is_nan()
            && !rsi[older].is_nan()
            && closes[recent] < closes[older]
            && rsi[recent] > rsi[older]
            && rsi[older] < 50.0
        {
            return Divergence::Bullish;
        }
    }

    // Bearish: higher high in price, lower high in RSI, older pivot overbought-side
    if let Some((recent, older)) = two_pivots(closes, start, end, true) {
        if !rsi[recent].is_nan()
            && !rsi[older].is_nan()
            && closes[recent] > closes[older]
            && rsi[recent] < rsi[older]
            && rsi[older] > 50.0
        {
            return Divergence::Bearish;
        }
    }

    Divergence::None
}

/// The two most recently confirmed pivots, newest first.
fn two_pivots(values: &[f64], start: usize, end: usize, maxima: bool) -> Option<(usize, usize)> {
    let mut newest = None;
    for i in (start..=end).rev() {
        if is_pivot(values, i, maxima) {
            match newest {
                None => newest = Some(i),
                Some(recent) => return Some((recent, i)),
            }
        }
    }
    None
}

/// Strict local extremum within two candles on each side, truncated
/// at the series edges.
fn is_pivot(values: &[f64], i: usize, maxima: bool) -> bool {
    let lo = i.saturating_sub(2);
    let hi = (i + 2).min(values.len() - 1);
    (lo..=hi).all(|j| {
        if j == i {
            true
        } else if maxima {
            values[j] < values[i]
        } else {
            values[j] > values[i]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullish_divergence() {
        // Price lows at index 2 (15.0) and index 7 (12.0): lower low
        let closes = vec![20.0, 18.0, 15.0, 18.0, 20.0, 19.0, 16.0, 12.0, 16.0, 18.0, 19.0];
        let mut rsi = vec![50.0; closes.len()];
        rsi[2] = 35.0; // older pivot, oversold side
        rsi[7] = 42.0; // higher RSI low

        assert_eq!(scan_divergence(&closes, &rsi, 30), Divergence::Bullish);
    }

    #[test]
    fn test_bearish_divergence() {
        // Price highs at index 2 (25.0) and index 7 (28.0): higher high
        let closes = vec![20.0, 22.0, 25.0, 22.0, 20.0, 21.0, 24.0, 28.0, 24.0, 22.0, 21.0];
        let mut rsi = vec![50.0; closes.len()];
        rsi[2] = 72.0; // older pivot, overbought side
        rsi[7] = 61.0; // lower RSI high

        assert_eq!(scan_divergence(&closes, &rsi, 30), Divergence::Bearish);
    }

    #[test]
    fn test_agreeing_momentum_is_none() {
        // Lower low in price with a lower RSI low confirms, no divergence
        let closes = vec![20.0, 18.0, 15.0, 18.0, 20.0, 19.0, 16.0, 12.0, 16.0, 18.0, 19.0];
        let mut rsi = vec![50.0; closes.len()];
        rsi[2] = 42.0;
        rsi[7] = 30.0;

        assert_eq!(scan_divergence(&closes, &rsi, 30), Divergence::None);
    }

    #[test]
    fn test_older_pivot_wrong_side_is_none() {
        let closes = vec![20.0, 18.0, 15.0, 18.0, 20.0, 19.0, 16.0, 12.0, 16.0, 18.0, 19.0];
        let mut rsi = vec![50.0; closes.len()];
        rsi[2] = 58.0; // not below 50
        rsi[7] = 62.0;

        assert_eq!(scan_divergence(&closes, &rsi, 30), Divergence::None);
    }

    #[test]
    fn test_lookback_excludes_old_pivots() {
        let closes = vec![20.0, 18.0, 15.0, 18.0, 20.0, 19.0, 16.0, 12.0, 16.0, 18.0, 19.0];
        let mut rsi = vec![50.0; closes.len()];
        rsi[2] = 35.0;
        rsi[7] = 42.0;

        // A window admitting only the recent pivot finds one, not two
        assert_eq!(scan_divergence(&closes, &rsi, 5), Divergence::None);
    }

    #[test]
    fn test_short_series_is_none() {
        let closes = vec![10.0, 9.0, 10.0];
        let rsi = vec![50.0, 45.0, 50.0];
        assert_eq!(scan_divergence(&closes, &rsi, 30), Divergence::None);
    }

    #[test]
    fn test_momentum_context_neutral_on_short_history() {
        let config = StrategyConfig::default();
        let candles: Vec<Candle> = (0..5)
            .map(|i| Candle::new(i as i64 * 3600, 100.0, 101.0, 99.0, 100.0, 1000.0))
            .collect();

        let context = momentum_context(&candles, &config);
        assert_eq!(context.rsi, 50.0);
        assert!(context.momentum_ok);
        assert_eq!(context.divergence, Divergence::None);
    }
}
