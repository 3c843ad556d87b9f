use super::{window_cutoff, Period, TimedValues};
use shared::models::PriceSeries;

/// Percentage decline from the running in-window peak, per point.
///
/// Values are `<= 0` and exactly `0` at each new peak. Points whose running
/// peak is still zero read `0`. Empty unless the window holds at least two points.
pub fn drawdown_series(series: &PriceSeries, period: Period) -> TimedValues {
    let Some(cutoff) = window_cutoff(series, period) else {
        return Vec::new();
    };
    let window = series.since(cutoff);
    if window.len() < 2 {
        return Vec::new();
    }

    window
        .iter()
        .scan(f64::NEG_INFINITY, |peak, p| {
            *peak = peak.max(p.close);
            let drawdown = if *peak == 0.0 {
                0.0
            } else {
                (p.close - *peak) / *peak * 100.0
            };
            Some((p.timestamp, drawdown))
        })
        .collect()
}

/// Drawdown of the latest close from the highest close in the window.
pub fn current_drawdown(series: &PriceSeries, period: Period) -> Option<f64> {
    let cutoff = window_cutoff(series, period)?;
    let latest = series.latest()?.close;
    let peak = series
        .since(cutoff)
        .iter()
        .map(|p| p.close)
        .fold(f64::NEG_INFINITY, f64::max);

    if !peak.is_finite() || peak == 0.0 {
        return None;
    }
    Some((latest - peak) / peak * 100.0)
}
