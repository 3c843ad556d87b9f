pub mod csv_parser;
pub mod market_data;

pub use market_data::{CsvDirectorySource, MarketDataStore, PriceSource};
