// Per-symbol report assembly
use super::helpers::{history_from_values, trailing_present};
use super::BenchmarkSummary;
use crate::analysis::{
    cumulative_return, current_drawdown, drawdown_series, last_upward_crossover, point_change,
    window_cutoff, Period,
};
use crate::error::EngineError;
use crate::indicators::{self, IndicatorSeries};
use chrono::Utc;
use shared::models::{AssetReport, History, PriceSeries, Signal};
use std::collections::HashMap;

/// Identity of the instrument a report is built for.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDescriptor {
    pub symbol: String,
    pub display_name: String,
    pub asset_type: String,
}

pub fn build_asset_report(
    asset: &AssetDescriptor,
    series: &PriceSeries,
    drawdown_period: Period,
    change_period: Period,
    benchmark: &BenchmarkSummary,
) -> Result<AssetReport, EngineError> {
    let symbol = asset.symbol.as_str();
    let latest_price = series
        .latest()
        .map(|p| p.close)
        .ok_or_else(|| EngineError::insufficient_data(symbol, "no price history available"))?;

    let ind = indicators::compute(series);
    let latest = ind.latest();

    let change_pct = point_change(series, change_period);
    let current_drawdown_pct = current_drawdown(series, drawdown_period);

    let (ema_signal, ema_short_last_buy_date) = match (latest.ema13, latest.ema21) {
        (Some(short), Some(long)) => (
            Signal::from_comparison(short, long),
            last_upward_crossover(&ind.column(&ind.ema13), &ind.column(&ind.ema21)),
        ),
        _ => (None, None),
    };
    let (ema_long_signal, ema_long_last_buy_date) = match (latest.ema100, latest.ema200) {
        (Some(short), Some(long)) => (
            Signal::from_comparison(short, long),
            last_upward_crossover(&ind.column(&ind.ema100), &ind.column(&ind.ema200)),
        ),
        _ => (None, None),
    };

    let change_1y = point_change(series, Period::OneYear);
    let relative_perf_1y = if symbol == benchmark.symbol {
        Some(0.0)
    } else {
        benchmark.change_1y.map(|b| change_1y - b)
    };

    let (ema13_1y_history, ema21_1y_history) = ema_histories(symbol, &ind);

    let report = AssetReport {
        name: asset.symbol.clone(),
        display_name: asset.display_name.clone(),
        asset_type: asset.asset_type.clone(),
        latest_price,
        change_pct,
        ema13: latest.ema13,
        ema21: latest.ema21,
        rsi14: latest.rsi14,
        ema100: latest.ema100,
        ema200: latest.ema200,
        current_drawdown_pct,
        ema_signal,
        ema_long_signal,
        ema_short_last_buy_date,
        ema_long_last_buy_date,
        last_updated: Utc::now(),
        relative_perf_1y,
        sparkline_data: sparkline(series, change_period),
        asset_1y_history: history_from_values(
            symbol,
            "asset_1y_history",
            cumulative_return(series, Period::OneYear)
                .into_iter()
                .map(|(ts, v)| (ts, Some(v))),
        ),
        rsi_1y_history: history_from_values(
            symbol,
            "rsi_1y_history",
            trailing_present(&ind.column(&ind.rsi14), Period::OneYear)
                .into_iter()
                .map(|(ts, v)| (ts, Some(v))),
        ),
        ema13_1y_history,
        ema21_1y_history,
        drawdown_history: history_from_values(
            symbol,
            "drawdown_history",
            drawdown_series(series, drawdown_period)
                .into_iter()
                .map(|(ts, v)| (ts, Some(v))),
        ),
    };

    tracing::debug!(
        symbol,
        latest_price,
        change_pct,
        relative_perf_1y = ?report.relative_perf_1y,
        "Built asset report"
    );
    Ok(report)
}

/// Closes inside the change window; the last two closes if the window is empty.
pub fn sparkline(series: &PriceSeries, change_period: Period) -> Vec<f64> {
    if series.len() < 2 {
        return Vec::new();
    }
    let window = window_cutoff(series, change_period)
        .map(|cutoff| series.since(cutoff))
        .unwrap_or_default();
    let points = if window.is_empty() { series.tail(2) } else { window };
    points.iter().map(|p| p.close).collect()
}

/// One-year EMA13 history and EMA21 re-aligned onto the EMA13 dates.
///
/// Both are cleared together if either loses a value on those dates.
fn ema_histories(symbol: &str, ind: &IndicatorSeries) -> (History, History) {
    let ema13 = trailing_present(&ind.column(&ind.ema13), Period::OneYear);
    if ema13.is_empty() {
        return (History::default(), History::default());
    }

    let ema21_by_time: HashMap<_, _> = ind
        .timestamps
        .iter()
        .copied()
        .zip(ind.ema21.iter().copied())
        .collect();

    let mut short = history_from_values(
        symbol,
        "ema13_1y_history",
        ema13.iter().map(|&(ts, v)| (ts, Some(v))),
    );
    let mut long = history_from_values(
        symbol,
        "ema21_1y_history",
        ema13
            .iter()
            .map(|&(ts, _)| (ts, ema21_by_time.get(&ts).copied().flatten())),
    );

    if short.is_empty() != long.is_empty() {
        tracing::warn!(symbol, "EMA history length mismatch, clearing EMA history");
        short.clear();
        long.clear();
    }
    (short, long)
}
