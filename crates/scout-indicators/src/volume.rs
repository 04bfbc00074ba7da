//! Volume indicators.

use scout_core::traits::CandleIndicator;
use scout_core::Candle;

/// On-Balance Volume (OBV).
///
/// Running cumulative volume: adds the candle's volume on a higher
/// close, subtracts it on a lower close, and carries the total
/// unchanged on an equal close. The series starts at 0.
#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    /// Create a new OBV indicator.
    pub fn new() -> Self {
        Self
    }
}

impl CandleIndicator for Obv {
    type Output = f64;

    fn calculate(&self, candles: &[Candle]) -> Vec<f64> {
        if candles.is_empty() {
            return vec![];
        }

        let mut result = Vec::with_capacity(candles.len());
        let mut obv = 0.0;
        result.push(obv);

        for pair in candles.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            if curr.close > prev.close {
                obv += curr.volume;
            } else if curr.close < prev.close {
                obv -= curr.volume;
            }
            result.push(obv);
        }

        result
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "OBV"
    }
}
