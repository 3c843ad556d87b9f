use super::{window_cutoff, Period, TimedValues};
use shared::models::PriceSeries;

/// Percentage change from the last close at or before the period cutoff to the latest close.
///
/// Falls back to the earliest close when nothing precedes the cutoff. Returns `0.0`
/// for fewer than two points or a zero/non-finite base or latest close.
pub fn point_change(series: &PriceSeries, period: Period) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let (Some(latest), Some(earliest)) = (series.latest(), series.first()) else {
        return 0.0;
    };

    let cutoff = period.cutoff(latest.timestamp);
    let historical = series.at_or_before(cutoff).unwrap_or(earliest).close;
    if historical == 0.0 || latest.close == 0.0 || !historical.is_finite() || !latest.close.is_finite() {
        return 0.0;
    }
    (latest.close - historical) / historical * 100.0
}

/// Cumulative percentage return of every in-window point, rebased on the first one.
///
/// Empty when the series has fewer than two points or the window is empty.
pub fn cumulative_return(series: &PriceSeries, period: Period) -> TimedValues {
    if series.len() < 2 {
        return Vec::new();
    }
    let Some(cutoff) = window_cutoff(series, period) else {
        return Vec::new();
    };
    let window = series.since(cutoff);
    let Some(base) = window.first().map(|p| p.close) else {
        return Vec::new();
    };

    window
        .iter()
        .map(|p| (p.timestamp, (p.close / base - 1.0) * 100.0))
        .filter(|(_, value)| value.is_finite())
        .collect()
}
