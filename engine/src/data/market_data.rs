// Price history sources for the dashboard
use crate::data::csv_parser::DailyCsvParser;
use crate::error::EngineError;
use chrono::Duration;
use shared::models::{PricePoint, PriceSeries};
use std::collections::HashMap;
use std::path::PathBuf;

/// Anything that can hand back daily price history for a symbol.
///
/// Calls are blocking and made one symbol at a time.
pub trait PriceSource {
    /// Up to `days` calendar days of history ending at the symbol's latest observation.
    fn fetch_daily_history(&self, symbol: &str, days: u32) -> Result<PriceSeries, EngineError>;
}

/// Restricts a series to the `days` calendar days ending at its latest point.
pub fn trim_to_lookback(series: &PriceSeries, days: u32) -> PriceSeries {
    match series.latest() {
        Some(latest) => series.window(latest.timestamp - Duration::days(i64::from(days))),
        None => series.clone(),
    }
}

/// In-memory history keyed by symbol.
pub struct MarketDataStore {
    data: HashMap<String, Vec<PricePoint>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            data: HashMap::new(),
        }
    }

    /// Merges `new_points` into the symbol's history, keeping timestamps unique and ordered.
    pub fn add_points(&mut self, symbol: &str, new_points: Vec<PricePoint>) {
        let points = self.data.entry(symbol.to_string()).or_default();
        points.extend(new_points);
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
    }

    pub fn get_series(&self, symbol: &str) -> Option<PriceSeries> {
        self.data
            .get(symbol)
            .map(|points| PriceSeries::new(symbol, points.clone()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for MarketDataStore {
    fn fetch_daily_history(&self, symbol: &str, days: u32) -> Result<PriceSeries, EngineError> {
        let series = self
            .get_series(symbol)
            .ok_or_else(|| EngineError::MarketDataError(format!("Symbol '{}' not found in store", symbol)))?;
        Ok(trim_to_lookback(&series, days))
    }
}

/// Reads `<dir>/<symbol>.csv` on every fetch.
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }
}

impl PriceSource for CsvDirectorySource {
    fn fetch_daily_history(&self, symbol: &str, days: u32) -> Result<PriceSeries, EngineError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(EngineError::MarketDataError(format!(
                "Symbol '{}' not found: no file at {}",
                symbol,
                path.display()
            )));
        }
        tracing::debug!(symbol, path = %path.display(), "Loading price history from CSV");
        let series = DailyCsvParser::load_series_from_csv(&path, symbol)?;
        Ok(trim_to_lookback(&series, days))
    }
}
