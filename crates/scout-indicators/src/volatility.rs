//! Volatility indicators.

use scout_core::traits::{CandleIndicator, Indicator};
use scout_core::Candle;
use serde::{Deserialize, Serialize};

/// Average True Range (ATR).
///
/// Wilder-smoothed mean true range; the volatility unit behind stop
/// placement and the excess-volatility filter.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl CandleIndicator for Atr {
    type Output = f64;

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        let mut result = vec![f64::NAN; candles.len()];
        if candles.len() < self.period + 1 {
            return result;
        }

        // True range needs the prior close, so the series starts at candle 1
        let mut tr = Vec::with_capacity(candles.len() - 1);
        for pair in candles.windows(2) {
            tr.push(pair[1].true_range(Some(pair[0].close)));
        }

        let period_f64 = self.period as f64;

        // Initial ATR is SMA of first 'period' true ranges
        let mut atr: f64 = tr[..self.period].iter().sum::<f64>() / period_f64;
        result[self.period] = atr;

        // Wilder's smoothing
        for (k, &tr_val) in tr[self.period..].iter().enumerate() {
            atr = (atr * (period_f64 - 1.0) + tr_val) / period_f64;
            result[self.period + 1 + k] = atr;
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "ATR"
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
    /// Bandwidth ((upper - lower) / middle)
    pub bandwidth: f64,
    /// %B ((price - lower) / (upper - lower))
    pub percent_b: f64,
}

impl BollingerOutput {
    fn warmup() -> Self {
        Self {
            upper: f64::NAN,
            middle: f64::NAN,
            lower: f64::NAN,
            bandwidth: f64::NAN,
            percent_b: f64::NAN,
        }
    }

    /// True once the warmup window has been consumed.
    pub fn is_ready(&self) -> bool {
        !self.middle.is_nan()
    }

    /// Check if price is above upper band.
    pub fn is_overbought(&self, price: f64) -> bool {
        price > self.upper
    }

    /// Check if price is below lower band.
    pub fn is_oversold(&self, price: f64) -> bool {
        price < self.lower
    }
}

/// Bollinger Bands.
///
/// SMA middle band with upper and lower bands offset by a multiple of
/// the population standard deviation over the same window.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        let mut result = vec![BollingerOutput::warmup(); data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;

        for (i, window) in data.windows(self.period).enumerate() {
            let mean: f64 = window.iter().sum::<f64>() / period_f64;
            let variance: f64 = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
            let std_dev = variance.sqrt();

            let upper = mean + self.std_dev_multiplier * std_dev;
            let lower = mean - self.std_dev_multiplier * std_dev;

            let bandwidth = if mean != 0.0 {
                (upper - lower) / mean
            } else {
                0.0
            };

            let price = data[self.period - 1 + i];
            let percent_b = if upper != lower {
                (price - lower) / (upper - lower)
            } else {
                0.5
            };

            result[self.period - 1 + i] = BollingerOutput {
                upper,
                middle: mean,
                lower,
                bandwidth,
                percent_b,
            };
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}
