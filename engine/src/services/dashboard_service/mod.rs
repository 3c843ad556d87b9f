// engine/src/services/dashboard_service/mod.rs
// DashboardService and the per-stage handlers it dispatches to.

use crate::analysis::Period;
use crate::config::DashboardSettings;
use crate::data::PriceSource;
use crate::error::EngineError;
use shared::models::{AssetError, AssetOutcome, AssetReport, DashboardReport};
use std::collections::BTreeMap;

pub mod benchmark;
pub mod build_asset_report;
pub mod helpers;

pub use benchmark::{load_benchmark, BenchmarkSummary};
pub use build_asset_report::{build_asset_report, AssetDescriptor};

/// Builds the dashboard from one price source, one symbol at a time.
pub struct DashboardService<S: PriceSource> {
    settings: DashboardSettings,
    source: S,
}

impl<S: PriceSource> DashboardService<S> {
    pub fn new(settings: DashboardSettings, source: S) -> Self {
        DashboardService { settings, source }
    }

    pub fn build_dashboard(&self, drawdown_period: Period, change_period: Period) -> DashboardReport {
        tracing::info!(
            drawdown_period = %drawdown_period,
            change_period = %change_period,
            market_symbols = self.settings.market_symbols.len(),
            assets = self.settings.assets.len(),
            "Building dashboard"
        );

        let benchmark = load_benchmark(
            &self.source,
            &self.settings.benchmark,
            self.settings.benchmark_history_days,
        );

        let mut market_data = BTreeMap::new();
        for market in &self.settings.market_symbols {
            let outcome = self.asset_outcome(&market.symbol, drawdown_period, change_period, &benchmark);
            market_data.insert(market.symbol.clone(), outcome);
        }

        let mut asset_data = BTreeMap::new();
        for asset in &self.settings.assets {
            let outcome = self.asset_outcome(&asset.symbol, drawdown_period, change_period, &benchmark);
            asset_data.insert(asset.symbol.clone(), outcome);
        }

        let failed = market_data
            .values()
            .chain(asset_data.values())
            .filter(|o| o.is_failed())
            .count();
        tracing::info!(
            reports = market_data.len() + asset_data.len() - failed,
            failed,
            "Dashboard complete"
        );

        DashboardReport {
            market_data,
            asset_data,
            benchmark_history: benchmark.history,
        }
    }

    /// Fetches and builds one symbol, folding any failure into an error record.
    fn asset_outcome(
        &self,
        symbol: &str,
        drawdown_period: Period,
        change_period: Period,
        benchmark: &BenchmarkSummary,
    ) -> AssetOutcome {
        let descriptor = AssetDescriptor {
            symbol: symbol.to_string(),
            display_name: self.settings.display_name(symbol),
            asset_type: self.settings.asset_type(symbol),
        };
        match self.report_for(&descriptor, drawdown_period, change_period, benchmark) {
            Ok(report) => AssetOutcome::Report(Box::new(report)),
            Err(e) => {
                if e.is_not_found() {
                    tracing::warn!(symbol, error = %e, "No price history for symbol");
                } else {
                    tracing::error!(symbol, error = %e, "Failed to build asset report");
                }
                AssetOutcome::Failed(AssetError {
                    name: descriptor.symbol,
                    display_name: descriptor.display_name,
                    error: e.to_string(),
                })
            }
        }
    }

    fn report_for(
        &self,
        descriptor: &AssetDescriptor,
        drawdown_period: Period,
        change_period: Period,
        benchmark: &BenchmarkSummary,
    ) -> Result<AssetReport, EngineError> {
        let series = self
            .source
            .fetch_daily_history(&descriptor.symbol, self.settings.history_days)?;
        tracing::debug!(symbol = %descriptor.symbol, points = series.len(), "Fetched price history");
        build_asset_report(descriptor, &series, drawdown_period, change_period, benchmark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssetEntry, MarketSymbol};
    use crate::data::MarketDataStore;
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::PricePoint;

    fn points(closes: &[f64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                open: close, high: close, low: close, close,
                volume: 0.0,
            })
            .collect()
    }

    fn settings() -> DashboardSettings {
        DashboardSettings {
            market_symbols: vec![
                MarketSymbol { symbol: "SPY".to_string(), display_name: "SPY".to_string() },
                MarketSymbol { symbol: "^VIX".to_string(), display_name: "VIX (Volatility)".to_string() },
            ],
            assets: vec![AssetEntry { symbol: "AAPL".to_string(), asset_type: "Stock".to_string() }],
            ..DashboardSettings::default()
        }
    }

    #[test]
    fn test_missing_symbol_becomes_error_record() {
        let mut store = MarketDataStore::new();
        store.add_points("SPY", points(&[100.0, 101.0, 102.0]));
        store.add_points("AAPL", points(&[10.0, 11.0, 12.0]));

        let service = DashboardService::new(settings(), store);
        let report = service.build_dashboard(Period::OneYear, Period::OneDay);

        let vix = &report.market_data["^VIX"];
        assert!(vix.is_failed());
        match vix {
            AssetOutcome::Failed(err) => {
                assert_eq!(err.display_name, "VIX (Volatility)");
                assert!(err.error.contains("not found"));
            }
            AssetOutcome::Report(_) => panic!("expected an error record"),
        }

        let spy = report.market_data["SPY"].report().unwrap();
        assert_eq!(spy.relative_perf_1y, Some(0.0));
        assert_eq!(spy.asset_type, "SPY");

        let aapl = report.asset_data["AAPL"].report().unwrap();
        assert_eq!(aapl.asset_type, "Stock");
        assert!((aapl.relative_perf_1y.unwrap() - 18.0).abs() < 1e-10);
        assert_eq!(report.benchmark_history.values, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_empty_series_becomes_error_record() {
        let mut store = MarketDataStore::new();
        store.add_points("AAPL", Vec::new());
        let service = DashboardService::new(settings(), store);
        let report = service.build_dashboard(Period::OneYear, Period::OneDay);
        assert!(report.asset_data["AAPL"].is_failed());
        assert!(report.benchmark_history.is_empty());
    }
}
