//! Score composition.
//!
//! Pillars are evaluated in a fixed order: trend, pullback, momentum,
//! money flow, volatility, setup, then composition. The final clamp
//! to [0, 100] is authoritative; raw pillar totals are kept in the
//! breakdown for inspection.

use scout_config::StrategyConfig;
use scout_core::{
    Candle, ConfluenceType, Divergence, Interval, MoneyFlow, ScoreBreakdown, Signal, TradeSide,
};

use crate::flow::{flow_context, notional_24h, volume_contraction};
use crate::momentum::momentum_context;
use crate::pullback::pullback_context;
use crate::setup::build_setup;
use crate::trend::trend_context;
use crate::volatility::volatility_context;

/// Inputs for one scoring call.
///
/// The higher timeframe drives trend bias and strength; every other
/// pillar works on the lower, entry timeframe.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRequest<'a> {
    pub symbol: &'a str,
    pub source: &'a str,
    pub htf_candles: &'a [Candle],
    pub ltf_candles: &'a [Candle],
    pub htf: Interval,
    pub ltf: Interval,
    pub timestamp: i64,
    /// Externally supplied market capitalization, if known.
    pub market_cap: Option<f64>,
}

/// Score one symbol. Never fails: short or empty history degrades to
/// neutral sub-scores and, ultimately, a zero score.
pub fn score(request: &ScoreRequest<'_>, config: &StrategyConfig) -> Signal {
    let trend = trend_context(request.htf_candles, config);

    // Setups without full EMA alignment follow the structural direction
    let side = trend
        .bias
        .side()
        .unwrap_or_else(|| trend.structure.side());

    let pullback = pullback_context(request.ltf_candles, side, config);
    let momentum = momentum_context(request.ltf_candles, config);
    let flow = flow_context(request.ltf_candles, config.thresholds.flow_threshold);
    let volatility = volatility_context(request.ltf_candles, side, config);
    let setup = build_setup(request.ltf_candles, side, trend.adx, volatility.atr, config);

    let price = request
        .ltf_candles
        .last()
        .map(|c| c.close)
        .unwrap_or(0.0);

    // Trend pillar
    let mut trend_score = 0.0;
    if trend.bias.is_directional() {
        trend_score += config.weights.trend_base;
        if trend.adx > config.thresholds.strong_adx {
            trend_score += config.weights.trend_adx_bonus;
        }
    } else if setup.is_some() {
        trend_score += config.weights.trend_weak_bias;
    }

    // Structure pillar
    let mut structure_score = 0.0;
    if let Some(setup) = &setup {
        structure_score += match setup.confluence {
            ConfluenceType::FibStructure => config.weights.structure_fib,
            ConfluenceType::StructureOnly => config.weights.structure_level,
            ConfluenceType::AtrReversion => config.weights.structure_atr,
        };
        if setup.risk_reward < config.thresholds.min_risk_reward {
            structure_score -= config.weights.penalty_low_rr;
        }
    }

    // Money flow pillar, awarded only on agreement with the trade side
    let flow_agrees = match side {
        TradeSide::Long => flow.flow == MoneyFlow::Bullish,
        TradeSide::Short => flow.flow == MoneyFlow::Bearish,
    };
    let flow_score = if flow_agrees { config.weights.flow } else { 0.0 };

    // Timing pillar
    let contraction = volume_contraction(request.ltf_candles);
    let mut timing_score = 0.0;
    if pullback.is_pullback && contraction {
        timing_score += config.weights.timing_pullback;
    }
    if pullback.has_rejection {
        timing_score += config.weights.timing_rejection;
    }

    let strong_regime = config.adaptive && trend.adx > config.thresholds.strong_adx;
    if strong_regime {
        trend_score *= config.regime.trend;
        structure_score *= config.regime.structure;
        timing_score *= config.regime.timing;
    }

    let mut penalties = 0.0;
    if pullback.is_pullback && !contraction {
        penalties += config.weights.penalty_no_contraction;
    }
    let flow_disagrees = match side {
        TradeSide::Long => flow.flow == MoneyFlow::Bearish,
        TradeSide::Short => flow.flow == MoneyFlow::Bullish,
    };
    if flow_disagrees {
        penalties += config.weights.penalty_flow_disagree;
    }
    let divergence_disagrees = match side {
        TradeSide::Long => momentum.divergence == Divergence::Bearish,
        TradeSide::Short => momentum.divergence == Divergence::Bullish,
    };
    if divergence_disagrees {
        penalties += config.weights.penalty_divergence_disagree;
    }
    if volatility.overextended {
        penalties += config.weights.penalty_overextension;
    }
    if volatility.excess_atr {
        penalties += config.weights.penalty_excess_atr;
    }

    let mut bonuses = 0.0;
    let notional = notional_24h(request.ltf_candles, request.ltf);
    // An absent market cap must not change control flow; only a known
    // sub-floor cap withholds the liquidity bonus
    let cap_allows = request
        .market_cap
        .map_or(true, |cap| cap >= config.liquidity.min_market_cap);
    if notional >= config.liquidity.min_notional_24h && cap_allows {
        bonuses += config.weights.bonus_liquidity;
    }
    if let Some(cap) = request.market_cap {
        if cap > 0.0 && cap <= config.liquidity.small_cap_max {
            bonuses += config.weights.bonus_small_cap;
        } else if cap >= config.liquidity.mega_cap_min {
            bonuses += config.weights.bonus_mega_cap;
        }
    }

    let raw_total =
        trend_score + structure_score + flow_score + timing_score - penalties + bonuses;

    let mut final_score = raw_total.clamp(0.0, 100.0);
    if setup.is_none() || trend.adx < config.thresholds.min_trend_adx {
        final_score = 0.0;
    }

    Signal {
        symbol: request.symbol.to_string(),
        source: request.source.to_string(),
        htf: request.htf,
        ltf: request.ltf,
        price,
        score: final_score,
        setup,
        breakdown: ScoreBreakdown {
            trend: trend_score,
            structure: structure_score,
            money_flow: flow_score,
            timing: timing_score,
            penalties,
            bonuses,
            raw_total,
        },
        trend,
        momentum,
        pullback,
        timestamp: request.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trending series with structure: a steady climb, a consolidation
    /// shelf and a final pullback toward it.
    fn trending_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.8;
                let close = if i >= n - 6 {
                    // Pullback into the range
                    base - (i - (n - 6)) as f64 * 1.2
                } else {
                    base
                };
                Candle::new(
                    i as i64 * 3600,
                    close + 0.3,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1000.0 + (i % 7) as f64 * 50.0,
                )
            })
            .collect()
    }

    fn flat_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as i64 * 3600, 100.0, 100.5, 99.5, 100.0, 1000.0))
            .collect()
    }

    fn request<'a>(htf: &'a [Candle], ltf: &'a [Candle]) -> ScoreRequest<'a> {
        ScoreRequest {
            symbol: "BTCUSDT",
            source: "binance",
            htf_candles: htf,
            ltf_candles: ltf,
            htf: Interval::Hour4,
            ltf: Interval::Hour1,
            timestamp: 1_700_000_000,
            market_cap: None,
        }
    }

    fn small_config() -> StrategyConfig {
        let mut config = StrategyConfig::default();
        config.indicators.ema_fast = 10;
        config.indicators.ema_slow = 30;
        config.indicators.swing_window = 2;
        config
    }

    #[test]
    fn test_score_is_clamped() {
        let htf = trending_candles(120);
        let ltf = trending_candles(200);
        let signal = score(&request(&htf, &ltf), &small_config());

        assert!(signal.score >= 0.0 && signal.score <= 100.0);
    }

    #[test]
    fn test_flat_market_scores_zero() {
        let htf = flat_candles(120);
        let ltf = flat_candles(200);
        let signal = score(&request(&htf, &ltf), &small_config());

        // No trend strength means no setup and a forced zero
        assert_eq!(signal.score, 0.0);
        assert!(signal.setup.is_none());
    }

    #[test]
    fn test_trending_market_scores_and_sets_up() {
        let htf = trending_candles(120);
        let ltf = trending_candles(200);
        let signal = score(&request(&htf, &ltf), &small_config());

        assert!(signal.trend.adx > 20.0);
        assert!(signal.setup.is_some());
        assert!(signal.score > 0.0);
        assert!(signal.breakdown.trend > 0.0);
    }

    #[test]
    fn test_empty_input_degrades_to_zero() {
        let signal = score(&request(&[], &[]), &small_config());

        assert_eq!(signal.score, 0.0);
        assert!(signal.setup.is_none());
        assert_eq!(signal.price, 0.0);
    }

    #[test]
    fn test_score_zero_when_adx_below_minimum() {
        let mut config = small_config();
        // Raise the floor above anything the series can produce
        config.thresholds.min_trend_adx = 99.0;

        let htf = trending_candles(120);
        let ltf = trending_candles(200);
        let signal = score(&request(&htf, &ltf), &config);

        assert_eq!(signal.score, 0.0);
    }

    #[test]
    fn test_market_cap_bonus_applied() {
        let htf = trending_candles(120);
        let ltf = trending_candles(200);
        let config = small_config();

        let without = score(&request(&htf, &ltf), &config);

        let mut with_cap = request(&htf, &ltf);
        with_cap.market_cap = Some(100_000_000.0); // small cap
        let with = score(&with_cap, &config);

        assert!(with.breakdown.bonuses >= without.breakdown.bonuses + 5.0 - 1e-9);
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let htf = trending_candles(120);
        let ltf = trending_candles(200);
        let config = small_config();

        let first = score(&request(&htf, &ltf), &config);
        let second = score(&request(&htf, &ltf), &config);

        assert_eq!(first.score, second.score);
        assert_eq!(first.breakdown.raw_total, second.breakdown.raw_total);
    }
}
