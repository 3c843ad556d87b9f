//! Period-relative performance analysis over a single price series.
//!
//! Every window here is anchored on the series' own latest timestamp and
//! includes points at or after the cutoff.

pub mod crossover;
pub mod drawdown;
pub mod period;
pub mod returns;

pub use crossover::last_upward_crossover;
pub use drawdown::{current_drawdown, drawdown_series};
pub use period::{resolve, Period};
pub use returns::{cumulative_return, point_change};

use chrono::{DateTime, Utc};
use shared::models::PriceSeries;

/// Timestamped values produced by the window calculations.
pub type TimedValues = Vec<(DateTime<Utc>, f64)>;

/// Start of the `period` window ending at the latest point, if the series has one.
pub fn window_cutoff(series: &PriceSeries, period: Period) -> Option<DateTime<Utc>> {
    series.latest().map(|p| period.cutoff(p.timestamp))
}
