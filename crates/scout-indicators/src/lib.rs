//! Technical indicators with SIMD optimization.
//!
//! This crate provides the numeric transforms the scoring engine is built
//! on:
//! - Moving averages (SMA, EMA)
//! - Momentum (Wilder RSI)
//! - Trend strength (ADX)
//! - Volatility (ATR, Bollinger Bands)
//! - Volume (OBV)
//! - Swing structure (confirmed levels, trailing extremes, pinbar rejection)
//!
//! Every series output is aligned 1:1 with its input; warmup positions hold
//! NaN (zero for ADX). Inputs shorter than the lookback degrade to
//! sentinels instead of failing, so callers never need a length check
//! before calculating.

pub mod momentum;
pub mod moving_average;
pub mod simd;
pub mod swing;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::Rsi;
pub use moving_average::{Ema, Sma};
pub use swing::{is_rejection, swing_high, swing_levels, swing_low};
pub use trend::Adx;
pub use volatility::{Atr, BollingerBands, BollingerOutput};
pub use volume::Obv;
