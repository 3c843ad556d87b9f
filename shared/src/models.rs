use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One daily observation. Timestamps are always UTC; conversion happens at ingestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily price history for one symbol.
///
/// Points are kept ascending by timestamp with unique timestamps. Points without a
/// finite close are dropped on construction. Gaps (weekends, holidays) are left as-is.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Points with `timestamp >= cutoff`.
    pub fn since(&self, cutoff: DateTime<Utc>) -> &[PricePoint] {
        let start = self.points.partition_point(|p| p.timestamp < cutoff);
        &self.points[start..]
    }

    /// Last point with `timestamp <= cutoff`.
    pub fn at_or_before(&self, cutoff: DateTime<Utc>) -> Option<&PricePoint> {
        let end = self.points.partition_point(|p| p.timestamp <= cutoff);
        end.checked_sub(1).map(|i| &self.points[i])
    }

    /// The last `n` points (all of them if the series is shorter).
    pub fn tail(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// A copy restricted to `timestamp >= cutoff`.
    pub fn window(&self, cutoff: DateTime<Utc>) -> PriceSeries {
        Self {
            symbol: self.symbol.clone(),
            points: self.since(cutoff).to_vec(),
        }
    }
}

/// Moving-average trend state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    /// `Buy` when the short average is above the long one, `Sell` when below, `None` when equal.
    pub fn from_comparison(short: f64, long: f64) -> Option<Signal> {
        match short.partial_cmp(&long) {
            Some(Ordering::Greater) => Some(Signal::Buy),
            Some(Ordering::Less) => Some(Signal::Sell),
            _ => None,
        }
    }
}

/// Parallel date/value arrays for charting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct History {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

impl History {
    pub fn new(dates: Vec<String>, values: Vec<f64>) -> Self {
        Self { dates, values }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.values.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.dates.len() == self.values.len()
    }

    pub fn clear(&mut self) {
        self.dates.clear();
        self.values.clear();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetReport {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub latest_price: f64,
    /// Change over the requested change period, in percent.
    pub change_pct: f64,
    pub ema13: Option<f64>,
    pub ema21: Option<f64>,
    pub rsi14: Option<f64>,
    pub ema100: Option<f64>,
    pub ema200: Option<f64>,
    pub current_drawdown_pct: Option<f64>,
    pub ema_signal: Option<Signal>,
    pub ema_long_signal: Option<Signal>,
    pub ema_short_last_buy_date: Option<String>,
    pub ema_long_last_buy_date: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub relative_perf_1y: Option<f64>,
    pub sparkline_data: Vec<f64>,
    pub asset_1y_history: History,
    pub rsi_1y_history: History,
    pub ema13_1y_history: History,
    pub ema21_1y_history: History,
    pub drawdown_history: History,
}

impl AssetReport {
    pub fn histories(&self) -> [(&'static str, &History); 5] {
        [
            ("asset_1y_history", &self.asset_1y_history),
            ("rsi_1y_history", &self.rsi_1y_history),
            ("ema13_1y_history", &self.ema13_1y_history),
            ("ema21_1y_history", &self.ema21_1y_history),
            ("drawdown_history", &self.drawdown_history),
        ]
    }
}

/// Stand-in record for a symbol whose report could not be built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetError {
    pub name: String,
    pub display_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AssetOutcome {
    Report(Box<AssetReport>),
    Failed(AssetError),
}

impl AssetOutcome {
    pub fn report(&self) -> Option<&AssetReport> {
        match self {
            AssetOutcome::Report(report) => Some(report.as_ref()),
            AssetOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AssetOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardReport {
    pub market_data: BTreeMap<String, AssetOutcome>,
    pub asset_data: BTreeMap<String, AssetOutcome>,
    pub benchmark_history: History,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn point(day: i64, close: f64) -> PricePoint {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day);
        PricePoint { timestamp, open: close, high: close, low: close, close, volume: 0.0 }
    }

    #[test]
    fn test_series_sorts_dedups_and_drops_missing_closes() {
        let series = PriceSeries::new(
            "TEST",
            vec![point(2, 3.0), point(0, 1.0), point(1, f64::NAN), point(2, 9.0), point(3, 4.0)],
        );
        assert_eq!(series.closes(), vec![1.0, 3.0, 4.0]);
        assert_eq!(series.symbol(), "TEST");
    }

    #[test]
    fn test_since_includes_cutoff() {
        let series = PriceSeries::new("TEST", (0..5).map(|d| point(d, d as f64)).collect());
        let cutoff = series.points()[2].timestamp;
        assert_eq!(series.since(cutoff).len(), 3);
        assert_eq!(series.at_or_before(cutoff).map(|p| p.close), Some(2.0));
        let before_all = cutoff - Duration::days(30);
        assert!(series.at_or_before(before_all).is_none());
        assert_eq!(series.since(before_all).len(), 5);
    }

    #[test]
    fn test_tail_shorter_than_series() {
        let series = PriceSeries::new("TEST", vec![point(0, 1.0)]);
        assert_eq!(series.tail(2).len(), 1);
    }

    #[test]
    fn test_signal_from_comparison() {
        assert_eq!(Signal::from_comparison(2.0, 1.0), Some(Signal::Buy));
        assert_eq!(Signal::from_comparison(1.0, 2.0), Some(Signal::Sell));
        assert_eq!(Signal::from_comparison(1.0, 1.0), None);
        assert_eq!(Signal::from_comparison(f64::NAN, 1.0), None);
    }

    #[test]
    fn test_failed_outcome_serializes_flat() {
        let outcome = AssetOutcome::Failed(AssetError {
            name: "^VIX".to_string(),
            display_name: "VIX (Volatility)".to_string(),
            error: "no data".to_string(),
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["name"], "^VIX");
        assert_eq!(json["error"], "no data");
        assert!(outcome.is_failed());
    }
}
