use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Insufficient data for {symbol}: {reason}")]
    InsufficientData { symbol: String, reason: String },
}

impl EngineError {
    pub fn insufficient_data(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InsufficientData {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// True for lookups of a symbol the price source does not know.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::MarketDataError(msg) if msg.to_lowercase().contains("not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::insufficient_data("AAPL", "no price history");
        assert_eq!(err.to_string(), "Insufficient data for AAPL: no price history");

        let err = EngineError::MarketDataError("Symbol 'XYZ' not found".to_string());
        assert!(err.is_not_found());
        assert!(!EngineError::ConfigError("bad".to_string()).is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: EngineError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
