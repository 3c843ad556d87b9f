pub mod settings;

pub use settings::{AssetEntry, DashboardSettings, MarketSymbol};
