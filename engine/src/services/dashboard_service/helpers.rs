// History shaping shared by the report handlers
use crate::analysis::Period;
use chrono::{DateTime, Utc};
use shared::models::History;
use shared::utils::{iso_date, round2};

/// Builds a chart history from timestamped values, rounding to 2 decimals.
///
/// Absent and non-finite values are dropped from `values` but their dates are kept,
/// so any gap shows up as a length mismatch and the whole history is cleared.
pub fn history_from_values<I>(symbol: &str, label: &str, points: I) -> History
where
    I: IntoIterator<Item = (DateTime<Utc>, Option<f64>)>,
{
    let (dates, values): (Vec<String>, Vec<Option<f64>>) =
        points.into_iter().map(|(ts, v)| (iso_date(&ts), v)).unzip();
    let values: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .map(round2)
        .collect();

    let mut history = History::new(dates, values);
    if !history.is_consistent() {
        tracing::warn!(
            symbol,
            history = label,
            dates = history.dates.len(),
            values = history.values.len(),
            "History length mismatch after dropping missing values, clearing history"
        );
        history.clear();
    }
    history
}

/// Points with a value, in the `period` window ending at the last such point.
///
/// Empty unless at least two points have a value.
pub fn trailing_present(
    column: &[(DateTime<Utc>, Option<f64>)],
    period: Period,
) -> Vec<(DateTime<Utc>, f64)> {
    let present: Vec<(DateTime<Utc>, f64)> = column
        .iter()
        .filter_map(|&(ts, v)| v.filter(|x| x.is_finite()).map(|x| (ts, x)))
        .collect();
    if present.len() < 2 {
        return Vec::new();
    }
    let Some(&(latest, _)) = present.last() else {
        return Vec::new();
    };
    let cutoff = period.cutoff(latest);
    present.into_iter().filter(|&(ts, _)| ts >= cutoff).collect()
}
