//! Trend strength indicators.

use scout_core::traits::CandleIndicator;
use scout_core::Candle;

use crate::momentum::wilder_smooth;

/// Average Directional Index (ADX).
///
/// Quantifies trend strength regardless of direction. Values above 25
/// typically signal a strong trend; below 20, a ranging market.
///
/// Output is zero-filled over the warmup prefix instead of NaN, and a
/// series shorter than `2 * period` yields all zeros. The smoothing is
/// seeded at 10 so the curve converges on short histories.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create a new ADX indicator. 14 is the conventional period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl CandleIndicator for Adx {
    type Output = f64;

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        let mut result = vec![0.0; candles.len()];
        if candles.len() < self.period * 2 {
            return result;
        }

        // Per-candle true range and directional movements
        let mut tr = Vec::with_capacity(candles.len() - 1);
        let mut plus_dm = Vec::with_capacity(candles.len() - 1);
        let mut minus_dm = Vec::with_capacity(candles.len() - 1);

        for pair in candles.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            tr.push(curr.true_range(Some(prev.close)));

            let up_move = curr.high - prev.high;
            let down_move = prev.low - curr.low;
            plus_dm.push(if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            });
            minus_dm.push(if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            });
        }

        let smooth_tr = wilder_smooth(&tr, self.period);
        let smooth_plus = wilder_smooth(&plus_dm, self.period);
        let smooth_minus = wilder_smooth(&minus_dm, self.period);

        let period_f64 = self.period as f64;
        let mut adx = 10.0;

        for k in 0..smooth_tr.len() {
            let (plus_di, minus_di) = if smooth_tr[k] == 0.0 {
                (0.0, 0.0)
            } else {
                (
                    100.0 * smooth_plus[k] / smooth_tr[k],
                    100.0 * smooth_minus[k] / smooth_tr[k],
                )
            };

            let di_sum = plus_di + minus_di;
            let dx = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            };

            adx = (adx * (period_f64 - 1.0) + dx) / period_f64;
            // First smoothed point describes the candle at index `period`
            result[self.period + k] = adx;
        }

        result
    }

    fn period(&self) -> usize {
        self.period * 2
    }

    fn name(&self) -> &str {
        "ADX"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Candle::new(
                    i as i64 * 3600,
                    close,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1000.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_adx_short_series_all_zero() {
        let adx = Adx::new(14);
        let candles = make_candles(&[100.0; 20]);
        let result = adx.calculate(&candles);

        assert_eq!(result.len(), 20);
        assert!(result.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_adx_strong_trend() {
        let adx = Adx::new(14);
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64 * 2.0).collect();
        let candles = make_candles(&closes);
        let result = adx.calculate(&candles);

        assert_eq!(result.len(), candles.len());
        // A one-way march keeps DX pinned high, so ADX climbs well past 25
        assert!(result[candles.len() - 1] > 25.0);
    }

    #[test]
    fn test_adx_bounds() {
        let adx = Adx::new(14);
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0)
            .collect();
        let candles = make_candles(&closes);
        let result = adx.calculate(&candles);

        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_adx_warmup_is_zero() {
        let adx = Adx::new(14);
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let candles = make_candles(&closes);
        let result = adx.calculate(&candles);

        for value in &result[..14] {
            assert_eq!(*value, 0.0);
        }
        assert!(result[14] > 0.0);
    }
}
