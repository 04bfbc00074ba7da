//! Money flow via OBV/price imbalance.

use scout_core::traits::CandleIndicator;
use scout_core::{Candle, Interval, MoneyFlow};
use scout_indicators::simd::{dot_product_simd, minmax_simd, sum_simd};
use scout_indicators::Obv;

/// Trailing window over which OBV and price are normalized.
const FLOW_LOOKBACK: usize = 30;

const CONTRACTION_RECENT: usize = 5;
const CONTRACTION_BASE: usize = 20;
const CONTRACTION_RATIO: f64 = 0.8;

/// Money flow classification with its raw imbalance.
#[derive(Debug, Clone, Copy)]
pub struct FlowContext {
    pub flow: MoneyFlow,
    /// Normalized OBV minus normalized price, in [-1, 1].
    pub imbalance: f64,
}

/// Compare where OBV and price each sit within their recent ranges.
///
/// OBV leading price upward reads as accumulation (BULLISH), lagging
/// as distribution (BEARISH), inside the threshold band as NEUTRAL.
pub fn flow_context(candles: &[Candle], threshold: f64) -> FlowContext {
    if candles.len() < 2 {
        return FlowContext {
            flow: MoneyFlow::Neutral,
            imbalance: 0.0,
        };
    }

    let obv = Obv::new().calculate(candles);
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let start = candles.len().saturating_sub(FLOW_LOOKBACK);
    let imbalance = normalized_last(&obv[start..]) - normalized_last(&closes[start..]);

    let flow = if imbalance > threshold {
        MoneyFlow::Bullish
    } else if imbalance < -threshold {
        MoneyFlow::Bearish
    } else {
        MoneyFlow::Neutral
    };

    FlowContext { flow, imbalance }
}

/// Position of the window's last value within its min-max range.
fn normalized_last(window: &[f64]) -> f64 {
    let Some(&last) = window.last() else {
        return 0.5;
    };
    match minmax_simd(window) {
        Some((min, max)) if max > min => (last - min) / (max - min),
        _ => 0.5,
    }
}

/// True when recent volume has dried up against its base window.
pub fn volume_contraction(candles: &[Candle]) -> bool {
    if candles.len() < CONTRACTION_RECENT + CONTRACTION_BASE {
        return false;
    }

    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    let split = volumes.len() - CONTRACTION_RECENT;
    let recent_mean = sum_simd(&volumes[split..]) / CONTRACTION_RECENT as f64;
    let base_mean = sum_simd(&volumes[split - CONTRACTION_BASE..split]) / CONTRACTION_BASE as f64;

    base_mean > 0.0 && recent_mean < base_mean * CONTRACTION_RATIO
}

/// Quote-currency notional traded over roughly the last 24 hours.
pub fn notional_24h(candles: &[Candle], interval: Interval) -> f64 {
    let n = interval.candles_per_day().min(candles.len());
    let start = candles.len() - n;
    let closes: Vec<f64> = candles[start..].iter().map(|c| c.close).collect();
    let volumes: Vec<f64> = candles[start..].iter().map(|c| c.volume).collect();
    dot_product_simd(&closes, &volumes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: usize, close: f64, volume: f64) -> Candle {
        Candle::new(i as i64 * 3600, close, close + 0.5, close - 0.5, close, volume)
    }

    #[test]
    fn test_accumulation_reads_bullish() {
        // Price chops sideways while every up-candle carries heavy volume
        let mut candles = vec![candle(0, 100.0, 100.0)];
        for i in 1..40 {
            if i % 2 == 1 {
                candles.push(candle(i, 101.0, 5000.0));
            } else {
                candles.push(candle(i, 100.0, 100.0));
            }
        }
        // A light-volume dip leaves OBV near its high with price at its low
        candles.push(candle(40, 100.0, 100.0));

        let context = flow_context(&candles, 0.25);
        assert_eq!(context.flow, MoneyFlow::Bullish);
        assert!(context.imbalance > 0.25);
    }

    #[test]
    fn test_distribution_reads_bearish() {
        let mut candles = vec![candle(0, 100.0, 100.0)];
        for i in 1..40 {
            if i % 2 == 1 {
                candles.push(candle(i, 99.0, 5000.0));
            } else {
                candles.push(candle(i, 100.0, 100.0));
            }
        }
        // A light-volume bounce leaves OBV near its low with price at its high
        candles.push(candle(40, 100.0, 100.0));

        let context = flow_context(&candles, 0.25);
        assert_eq!(context.flow, MoneyFlow::Bearish);
        assert!(context.imbalance < -0.25);
    }

    #[test]
    fn test_balanced_flow_is_neutral() {
        // Volume tracks price exactly
        let candles: Vec<Candle> = (0..40)
            .map(|i| candle(i, 100.0 + i as f64, 1000.0))
            .collect();

        let context = flow_context(&candles, 0.25);
        assert_eq!(context.flow, MoneyFlow::Neutral);
    }

    #[test]
    fn test_short_series_is_neutral() {
        let context = flow_context(&[candle(0, 100.0, 1000.0)], 0.25);
        assert_eq!(context.flow, MoneyFlow::Neutral);
        assert_eq!(context.imbalance, 0.0);
    }

    #[test]
    fn test_volume_contraction() {
        let mut candles: Vec<Candle> = (0..25).map(|i| candle(i, 100.0, 2000.0)).collect();
        for i in 25..30 {
            candles.push(candle(i, 100.0, 500.0));
        }
        assert!(volume_contraction(&candles));
    }

    #[test]
    fn test_no_contraction_on_steady_volume() {
        let candles: Vec<Candle> = (0..30).map(|i| candle(i, 100.0, 2000.0)).collect();
        assert!(!volume_contraction(&candles));
    }

    #[test]
    fn test_contraction_needs_history() {
        let candles: Vec<Candle> = (0..10).map(|i| candle(i, 100.0, 2000.0)).collect();
        assert!(!volume_contraction(&candles));
    }

    #[test]
    fn test_notional_24h() {
        let candles: Vec<Candle> = (0..48).map(|i| candle(i, 2.0, 500.0)).collect();

        // Hourly candles: last 24 count, each 2.0 * 500
        let notional = notional_24h(&candles, Interval::Hour1);
        assert!((notional - 24_000.0).abs() < 1e-10);
    }

    #[test]
    fn test_notional_with_short_history() {
        let candles: Vec<Candle> = (0..6).map(|i| candle(i, 2.0, 500.0)).collect();
        let notional = notional_24h(&candles, Interval::Hour1);
        assert!((notional - 6_000.0).abs() < 1e-10);
    }
}
