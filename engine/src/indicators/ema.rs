// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use serde_json::Value;
use shared::models::PricePoint;

/// Recursive EMA with `alpha = 2 / (span + 1)`, seeded with the first close.
///
/// There is no warm-up: every point gets a value, the first one equal to its close.
pub struct Ema {
    name: String,
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            name: format!("EMA({})", span),
            span,
        }
    }

    fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "span": self.span })
    }

    fn calculate(&self, data: &[PricePoint]) -> Vec<Option<f64>> {
        if data.is_empty() || self.span == 0 {
            return vec![None; data.len()];
        }
        let closes: Vec<f64> = data.iter().map(|p| p.close).collect();
        smooth(&closes, self.alpha()).into_iter().map(Some).collect()
    }
}

/// `y[0] = x[0]`, `y[i] = (1 - alpha) * y[i-1] + alpha * x[i]`.
pub(crate) fn smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    values
        .iter()
        .scan(None::<f64>, |prev, &x| {
            let next = match *prev {
                Some(p) => (1.0 - alpha) * p + alpha * x,
                None => x,
            };
            *prev = Some(next);
            Some(next)
        })
        .collect()
}
