//! Volatility filter: band overextension and excess range.

use scout_config::StrategyConfig;
use scout_core::traits::{CandleIndicator, Indicator};
use scout_core::{Candle, TradeSide};
use scout_indicators::{Atr, BollingerBands};

/// Volatility features consumed by the score composition.
#[derive(Debug, Clone, Copy)]
pub struct VolatilityContext {
    pub atr: f64,
    /// ATR as a fraction of the latest close.
    pub atr_ratio: f64,
    /// Latest close outside the Bollinger band on the trade side.
    pub overextended: bool,
    pub excess_atr: bool,
}

/// Evaluate volatility conditions on the entry timeframe.
pub fn volatility_context(
    candles: &[Candle],
    side: TradeSide,
    config: &StrategyConfig,
) -> VolatilityContext {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let atr = Atr::new(config.indicators.atr)
        .calculate(candles)
        .last()
        .copied()
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0);

    let close = closes.last().copied().unwrap_or(0.0);
    let atr_ratio = if close > 0.0 { atr / close } else { 0.0 };

    let bands =
        BollingerBands::with_params(config.indicators.bollinger, config.indicators.bollinger_std_dev)
            .calculate(&closes);
    let overextended = bands
        .last()
        .map(|band| {
            band.is_ready()
                && match side {
                    TradeSide::Long => band.is_overbought(close),
                    TradeSide::Short => band.is_oversold(close),
                }
        })
        .unwrap_or(false);

    VolatilityContext {
        atr,
        atr_ratio,
        overextended,
        excess_atr: atr_ratio > config.thresholds.max_atr_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady_candles(n: usize, close: f64, spread: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                Candle::new(
                    i as i64 * 3600,
                    close,
                    close + spread,
                    close - spread,
                    close,
                    1000.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_quiet_market_passes() {
        let config = StrategyConfig::default();
        let candles = steady_candles(60, 100.0, 0.5);

        let context = volatility_context(&candles, TradeSide::Long, &config);
        assert!(!context.overextended);
        assert!(!context.excess_atr);
        assert!(context.atr > 0.0);
    }

    #[test]
    fn test_wide_ranges_flag_excess_atr() {
        let config = StrategyConfig::default();
        // 20-point ranges on a 100 price: ATR ratio far above 5%
        let candles = steady_candles(60, 100.0, 10.0);

        let context = volatility_context(&candles, TradeSide::Long, &config);
        assert!(context.excess_atr);
    }

    #[test]
    fn test_spike_above_band_is_overextended_for_long() {
        let config = StrategyConfig::default();
        let mut candles = steady_candles(40, 100.0, 1.0);
        // Closing spike well above the band built from a quiet base
        candles.push(Candle::new(40 * 3600, 100.0, 112.0, 100.0, 111.0, 1000.0));

        let context = volatility_context(&candles, TradeSide::Long, &config);
        assert!(context.overextended);

        // The same spike is not overextension for a short entry
        let context = volatility_context(&candles, TradeSide::Short, &config);
        assert!(!context.overextended);
    }

    #[test]
    fn test_empty_series_degrades() {
        let config = StrategyConfig::default();
        let context = volatility_context(&[], TradeSide::Long, &config);

        assert_eq!(context.atr, 0.0);
        assert_eq!(context.atr_ratio, 0.0);
        assert!(!context.overextended);
        assert!(!context.excess_atr);
    }
}
