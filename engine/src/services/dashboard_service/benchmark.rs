// Benchmark pre-pass: one-year change and cumulative history of the benchmark symbol
use super::helpers::history_from_values;
use crate::analysis::{cumulative_return, point_change, Period};
use crate::data::PriceSource;
use shared::models::History;

/// What every asset report needs to know about the benchmark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkSummary {
    pub symbol: String,
    /// `None` when the benchmark could not be fetched or has fewer than two points.
    pub change_1y: Option<f64>,
    pub history: History,
}

impl BenchmarkSummary {
    pub fn unavailable(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            change_1y: None,
            history: History::default(),
        }
    }
}

pub fn load_benchmark<S: PriceSource + ?Sized>(source: &S, symbol: &str, days: u32) -> BenchmarkSummary {
    let series = match source.fetch_daily_history(symbol, days) {
        Ok(series) => series,
        Err(e) => {
            tracing::warn!(symbol, error = %e, "Benchmark unavailable, relative performance disabled");
            return BenchmarkSummary::unavailable(symbol);
        }
    };
    if series.len() < 2 {
        tracing::warn!(symbol, points = series.len(), "Not enough benchmark history, relative performance disabled");
        return BenchmarkSummary::unavailable(symbol);
    }

    let change_1y = point_change(&series, Period::OneYear);
    let history = history_from_values(
        symbol,
        "benchmark_history",
        cumulative_return(&series, Period::OneYear)
            .into_iter()
            .map(|(ts, v)| (ts, Some(v))),
    );
    tracing::info!(symbol, change_1y, points = history.len(), "Loaded benchmark");
    BenchmarkSummary {
        symbol: symbol.to_string(),
        change_1y: Some(change_1y),
        history,
    }
}
