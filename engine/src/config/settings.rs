// Dashboard settings, loaded from a JSON file or left at their defaults
use crate::analysis::Period;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A market index shown in the header strip, with its human-readable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSymbol {
    pub symbol: String,
    pub display_name: String,
}

/// A tracked instrument and its asset class ("Stock", "ETF", "Crypto", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub symbol: String,
    pub asset_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Directory holding one `<symbol>.csv` per instrument.
    pub data_dir: PathBuf,
    /// Symbol relative performance is measured against.
    pub benchmark: String,
    pub market_symbols: Vec<MarketSymbol>,
    pub assets: Vec<AssetEntry>,
    /// Calendar days of history fetched per symbol.
    pub history_days: u32,
    /// Calendar days of history fetched for the benchmark pre-pass.
    pub benchmark_history_days: u32,
    pub default_drawdown_period: Period,
    pub default_change_period: Period,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        let market = [
            ("SPY", "SPY"),
            ("^DJI", "Dow Jones"),
            ("^GSPC", "S&P 500"),
            ("^VIX", "VIX (Volatility)"),
        ];
        let stocks = [
            "BA", "ABNB", "SHOP", "WDAY", "SWBI", "COIN", "QCOM", "AMD", "NVDA", "PLTR", "EQIX",
            "DIS", "PFE", "PSEC", "TSLA", "MSFT", "GOOG", "AMZN", "AAPL", "V", "UAL", "DAL",
        ];
        let assets = stocks
            .iter()
            .map(|s| (*s, "Stock"))
            .chain([("SOXX", "ETF"), ("SPXL", "ETF"), ("TQQQ", "ETF")])
            .chain([("BTC-USD", "Crypto"), ("LTC-USD", "Crypto")])
            .map(|(symbol, asset_type)| AssetEntry {
                symbol: symbol.to_string(),
                asset_type: asset_type.to_string(),
            })
            .collect();

        DashboardSettings {
            data_dir: PathBuf::from("data"),
            benchmark: "SPY".to_string(),
            market_symbols: market
                .iter()
                .map(|(symbol, name)| MarketSymbol {
                    symbol: symbol.to_string(),
                    display_name: name.to_string(),
                })
                .collect(),
            assets,
            history_days: 1826,
            benchmark_history_days: 395,
            default_drawdown_period: Period::OneYear,
            default_change_period: Period::OneDay,
        }
    }
}

impl DashboardSettings {
    /// Reads settings from a JSON file; omitted fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read settings file '{}': {}", path.display(), e))
        })?;
        let settings: DashboardSettings = serde_json::from_str(&raw).map_err(|e| {
            EngineError::ConfigError(format!("Invalid settings file '{}': {}", path.display(), e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.benchmark.trim().is_empty() {
            return Err(EngineError::ConfigError("benchmark symbol must not be empty".to_string()));
        }
        if self.history_days == 0 || self.benchmark_history_days == 0 {
            return Err(EngineError::ConfigError("history lookbacks must be at least one day".to_string()));
        }
        if let Some(entry) = self.assets.iter().find(|a| a.symbol.trim().is_empty()) {
            return Err(EngineError::ConfigError(format!(
                "asset entry with type '{}' has an empty symbol",
                entry.asset_type
            )));
        }
        Ok(())
    }

    /// Configured display name for market symbols, the symbol itself otherwise.
    pub fn display_name(&self, symbol: &str) -> String {
        self.market_symbols
            .iter()
            .find(|m| m.symbol == symbol)
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| symbol.to_string())
    }

    /// Market symbols report their display name as their type; assets their class.
    pub fn asset_type(&self, symbol: &str) -> String {
        self.market_symbols
            .iter()
            .find(|m| m.symbol == symbol)
            .map(|m| m.display_name.clone())
            .or_else(|| {
                self.assets
                    .iter()
                    .find(|a| a.symbol == symbol)
                    .map(|a| a.asset_type.clone())
            })
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
