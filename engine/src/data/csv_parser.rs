use crate::error::EngineError;
use csv::{ReaderBuilder, StringRecord};
use shared::models::{PricePoint, PriceSeries};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Cell-level parsing for daily exports (Yahoo-style "Date,Open,High,Low,Close,Adj Close,Volume").
pub mod daily_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use shared::utils::{assume_utc, to_utc};
    use std::str::FromStr;

    // Parses a price or volume cell. Empty and "null" cells are missing values (NaN).
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed.eq_ignore_ascii_case("nan") {
            return Ok(f64::NAN);
        }
        f64::from_str(trimmed).map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    // Accepts RFC 3339, "YYYY-MM-DD HH:MM:SS±HH:MM", naive "YYYY-MM-DD HH:MM:SS" and
    // plain "YYYY-MM-DD". Offsets are converted to UTC; naive values are taken as UTC.
    pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(to_utc(&dt));
        }
        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(to_utc(&dt));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
            return Ok(assume_utc(naive));
        }
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))?;
        Ok(assume_utc(date.and_time(NaiveTime::default())))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use shared::utils::iso_date;

        #[test]
        fn test_parse_decimal_values() {
            assert_eq!(parse_decimal("123.45").unwrap(), 123.45);
            assert_eq!(parse_decimal(" 1000 ").unwrap(), 1000.0);
            assert!(parse_decimal("null").unwrap().is_nan());
            assert!(parse_decimal("").unwrap().is_nan());
            assert!(parse_decimal("12,5").is_err());
        }

        #[test]
        fn test_parse_plain_date_is_utc_midnight() {
            let ts = parse_timestamp("2024-03-01").unwrap();
            assert_eq!(ts.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        }

        #[test]
        fn test_parse_offset_timestamp_converts_to_utc() {
            let ts = parse_timestamp("2024-03-01 00:00:00-05:00").unwrap();
            assert_eq!(ts.to_rfc3339(), "2024-03-01T05:00:00+00:00");
            assert_eq!(iso_date(&ts), "2024-03-01");

            let ts = parse_timestamp("2024-03-01T23:30:00+02:00").unwrap();
            assert_eq!(ts.to_rfc3339(), "2024-03-01T21:30:00+00:00");
        }

        #[test]
        fn test_parse_naive_timestamp() {
            let ts = parse_timestamp("2024-03-01 16:00:00").unwrap();
            assert_eq!(ts.to_rfc3339(), "2024-03-01T16:00:00+00:00");
        }

        #[test]
        fn test_parse_invalid_timestamp() {
            assert!(parse_timestamp("01/03/2024").is_err());
            assert!(parse_timestamp("2024-13-01").is_err());
        }
    }
}

pub struct DailyCsvParser;

impl DailyCsvParser {
    // CSV Header: Date,Open,High,Low,Close,Adj Close,Volume
    // Example Row: 2024-01-02,472.16,473.67,470.49,472.65,466.66,123623700
    pub fn load_series_from_csv(file_path: impl AsRef<Path>, symbol: &str) -> Result<PriceSeries, EngineError> {
        let file = File::open(file_path.as_ref())?;
        Self::load_series_from_reader(BufReader::new(file), symbol)
    }

    pub fn load_series_from_reader<R: Read>(reader: R, symbol: &str) -> Result<PriceSeries, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in ["Date", "Close"] {
            if Self::column(&headers, required).is_none() {
                return Err(EngineError::CsvDataFormatError(format!(
                    "Missing '{}' column in CSV header for {}",
                    required, symbol
                )));
            }
        }

        let mut points = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;

            let date_str = Self::get_field(&record, &headers, "Date").ok_or_else(|| {
                EngineError::CsvDataFormatError(format!("Missing 'Date' field at line {}", line))
            })?;
            let timestamp = daily_format::parse_timestamp(date_str).map_err(|e| {
                EngineError::CsvDataFormatError(format!("Error parsing 'Date' at line {}: {}", line, e))
            })?;

            let number = |name: &str| -> Result<f64, EngineError> {
                match Self::get_field(&record, &headers, name) {
                    Some(cell) => daily_format::parse_decimal(cell).map_err(|e| {
                        EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", name, line, e))
                    }),
                    None => Ok(f64::NAN),
                }
            };

            points.push(PricePoint {
                timestamp,
                open: number("Open")?,
                high: number("High")?,
                low: number("Low")?,
                close: number("Close")?,
                volume: number("Volume")?,
            });
        }

        let parsed_rows = points.len();
        let series = PriceSeries::new(symbol, points);
        if series.len() != parsed_rows {
            tracing::debug!(
                symbol,
                parsed_rows,
                kept = series.len(),
                "Dropped rows without a close or with duplicate dates"
            );
        }
        Ok(series)
    }

    fn column(headers: &StringRecord, name: &str) -> Option<usize> {
        headers.iter().position(|header| header == name)
    }

    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        Self::column(headers, name).and_then(|pos| record.get(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_series_from_csv_valid_data() {
        let csv_content = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-03,470.43,471.19,468.17,468.79,462.82,103585900
2024-01-02,472.16,473.67,470.49,472.65,466.66,123623700";
        let tmp_file = create_test_csv(csv_content);
        let series = DailyCsvParser::load_series_from_csv(tmp_file.path(), "SPY").unwrap();

        assert_eq!(series.symbol(), "SPY");
        assert_eq!(series.len(), 2);
        // Sorted ascending regardless of file order.
        assert_eq!(series.points()[0].close, 472.65);
        assert_eq!(series.points()[0].open, 472.16);
        assert_eq!(series.points()[1].volume, 103585900.0);
        assert_eq!(series.points()[1].timestamp, daily_format::parse_timestamp("2024-01-03").unwrap());
    }

    #[test]
    fn test_load_series_drops_null_rows() {
        let csv_content = "\
Date,Open,High,Low,Close,Volume
2024-01-02,1,1,1,10,5
2024-01-03,null,null,null,null,null
2024-01-04,1,1,1,11,5";
        let tmp_file = create_test_csv(csv_content);
        let series = DailyCsvParser::load_series_from_csv(tmp_file.path(), "X").unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn test_load_series_without_volume_column() {
        let csv_content = "Date,Close\n2024-01-02 00:00:00-05:00,18.5";
        let series = DailyCsvParser::load_series_from_reader(csv_content.as_bytes(), "^VIX").unwrap();
        assert_eq!(series.len(), 1);
        assert!(series.points()[0].volume.is_nan());
    }

    #[test]
    fn test_load_series_from_csv_empty_file() {
        let tmp_file = create_test_csv("Date,Open,High,Low,Close,Volume");
        let series = DailyCsvParser::load_series_from_csv(tmp_file.path(), "X").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_load_series_missing_close_column() {
        let tmp_file = create_test_csv("Date,Open\n2024-01-02,1.0");
        let err = DailyCsvParser::load_series_from_csv(tmp_file.path(), "X").unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        assert!(err.to_string().contains("Missing 'Close' column"));
    }

    #[test]
    fn test_load_series_invalid_data_format() {
        let csv_content = "\
Date,Open,High,Low,Close,Volume
2024-01-02,invalid,1,1,1,1";
        let err = DailyCsvParser::load_series_from_reader(csv_content.as_bytes(), "X").unwrap_err();
        assert!(err.to_string().contains("Error parsing 'Open' at line 2"));
    }

    #[test]
    fn test_load_series_invalid_date() {
        let csv_content = "Date,Close\n02/01/2024,1";
        let err = DailyCsvParser::load_series_from_reader(csv_content.as_bytes(), "X").unwrap_err();
        assert!(err.to_string().contains("Error parsing 'Date' at line 2"));
    }

    #[test]
    fn test_load_series_file_not_found() {
        let err = DailyCsvParser::load_series_from_csv("non_existent_file.csv", "X").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }
}
