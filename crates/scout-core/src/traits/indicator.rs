//! Indicator trait definitions.

use crate::types::Candle;

/// Trait for technical indicators over a single value series.
///
/// Outputs are aligned 1:1 with the input: positions inside the warmup
/// window hold a sentinel (NaN unless the indicator documents zero).
/// Short input degrades to sentinels; `calculate` never fails.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the lookback period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Trait for indicators that consume full OHLCV candles.
///
/// Same alignment and sentinel contract as [`Indicator`].
pub trait CandleIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given candles.
    fn calculate(&self, candles: &[Candle]) -> Vec<Self::Output>;

    /// Get the lookback period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WindowSum {
        period: usize,
    }

    impl Indicator for WindowSum {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            let mut out = vec![f64::NAN; data.len()];
            if data.len() < self.period {
                return out;
            }
            for i in (self.period - 1)..data.len() {
                out[i] = data[i + 1 - self.period..=i].iter().sum();
            }
            out
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "window_sum"
        }
    }

    #[test]
    fn test_output_alignment() {
        let indicator = WindowSum { period: 3 };
        let result = indicator.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 6.0).abs() < 0.001);
        assert!((result[4] - 12.0).abs() < 0.001);
    }

    #[test]
    fn test_short_input_degrades() {
        let indicator = WindowSum { period: 5 };
        let result = indicator.calculate(&[1.0, 2.0]);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
