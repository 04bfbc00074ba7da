//! Momentum indicators.

use scout_core::traits::Indicator;

/// Wilder's smoothing over a value series.
///
/// The first output is the plain average of the first `period` values;
/// each subsequent average folds in one value:
/// `avg = (prev_avg * (period - 1) + value) / period`.
/// Returns a compact vector whose first entry consumes `period` inputs.
pub(crate) fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    if values.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    let period_f64 = period as f64;

    let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
    result.push(avg);

    for &value in &values[period..] {
        avg = (avg * (period_f64 - 1.0) + value) / period_f64;
        result.push(avg);
    }

    result
}

/// Relative Strength Index (RSI), Wilder's method.
///
/// Measures the speed and magnitude of recent price changes. Output is
/// 100 whenever the smoothed average loss is zero.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. 14 is the conventional period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn rsi_value(gain: f64, loss: f64) -> f64 {
        if loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + gain / loss))
        }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.len() <= self.period {
            return result;
        }

        // Split price changes into gains and losses
        let mut gains = Vec::with_capacity(data.len() - 1);
        let mut losses = Vec::with_capacity(data.len() - 1);

        for i in 1..data.len() {
            let change = data[i] - data[i - 1];
            if change > 0.0 {
                gains.push(change);
                losses.push(0.0);
            } else {
                gains.push(0.0);
                losses.push(-change);
            }
        }

        let avg_gains = wilder_smooth(&gains, self.period);
        let avg_losses = wilder_smooth(&losses, self.period);

        // First smoothed average consumes the deltas of closes 1..=period,
        // so it describes the close at index `period`
        for (k, (&gain, &loss)) in avg_gains.iter().zip(avg_losses.iter()).enumerate() {
            result[self.period + k] = Self::rsi_value(gain, loss);
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}
