// Relative Strength Index (RSI) indicator implementation
use super::ema::smooth;
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::PricePoint;

/// Value reported where the average loss is zero and the ratio is undefined.
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI with Wilder smoothing (`alpha = 1 / period`, i.e. `com = period - 1`).
///
/// Gains and losses are smoothed recursively from the first point, the first
/// difference counting as zero. Wherever the smoothed loss is zero the result is
/// [`NEUTRAL_RSI`], so a flat series, and the very first point of any series, reads 50.
pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }

    fn alpha(&self) -> f64 {
        1.0 / self.period as f64
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[PricePoint]) -> Vec<Option<f64>> {
        if data.is_empty() || self.period == 0 {
            return vec![None; data.len()];
        }

        let changes: Vec<f64> = std::iter::once(0.0)
            .chain(data.windows(2).map(|w| w[1].close - w[0].close))
            .collect();
        let gains: Vec<f64> = changes.iter().map(|&c| if c > 0.0 { c } else { 0.0 }).collect();
        let losses: Vec<f64> = changes.iter().map(|&c| if c < 0.0 { -c } else { 0.0 }).collect();

        let avg_gain = smooth(&gains, self.alpha());
        let avg_loss = smooth(&losses, self.alpha());

        avg_gain
            .iter()
            .zip(avg_loss.iter())
            .map(|(&gain, &loss)| {
                if loss == 0.0 {
                    Some(NEUTRAL_RSI)
                } else {
                    let rs = gain / loss;
                    Some(100.0 - (100.0 / (1.0 + rs)))
                }
            })
            .collect()
    }
}
