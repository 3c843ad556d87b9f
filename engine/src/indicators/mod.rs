// Technical indicators module
pub mod ema;
pub mod rsi;

pub use ema::Ema;
pub use rsi::Rsi;

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::models::{PricePoint, PriceSeries};

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[PricePoint]) -> Vec<Option<f64>>; // One entry per input point, None where undefined
}

/// A timestamped indicator column, as consumed by the crossover detector and history builders.
pub type IndicatorColumn = Vec<(DateTime<Utc>, Option<f64>)>;

/// Indicator values aligned point-for-point with the source series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    pub ema13: Vec<Option<f64>>,
    pub ema21: Vec<Option<f64>>,
    pub ema100: Vec<Option<f64>>,
    pub ema200: Vec<Option<f64>>,
    pub rsi14: Vec<Option<f64>>,
}

/// Most recent value of every indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestIndicators {
    pub ema13: Option<f64>,
    pub ema21: Option<f64>,
    pub ema100: Option<f64>,
    pub ema200: Option<f64>,
    pub rsi14: Option<f64>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Pairs one of this series' columns with its timestamps.
    pub fn column(&self, values: &[Option<f64>]) -> IndicatorColumn {
        self.timestamps.iter().copied().zip(values.iter().copied()).collect()
    }

    pub fn latest(&self) -> LatestIndicators {
        fn last(values: &[Option<f64>]) -> Option<f64> {
            values.last().copied().flatten().filter(|v| v.is_finite())
        }
        LatestIndicators {
            ema13: last(&self.ema13),
            ema21: last(&self.ema21),
            ema100: last(&self.ema100),
            ema200: last(&self.ema200),
            rsi14: last(&self.rsi14),
        }
    }
}

/// EMA 13/21/100/200 and RSI 14 over the close prices of `series`.
pub fn compute(series: &PriceSeries) -> IndicatorSeries {
    let points = series.points();
    if points.is_empty() {
        return IndicatorSeries::default();
    }

    let result = IndicatorSeries {
        timestamps: series.timestamps(),
        ema13: Ema::new(13).calculate(points),
        ema21: Ema::new(21).calculate(points),
        ema100: Ema::new(100).calculate(points),
        ema200: Ema::new(200).calculate(points),
        rsi14: Rsi::new(14).calculate(points),
    };
    tracing::debug!(symbol = %series.symbol(), points = result.len(), "Computed indicators");
    result
}
