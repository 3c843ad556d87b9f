// Date and number helpers shared by the engine and report consumers.
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// `YYYY-MM-DD` of the UTC calendar date, not the local date of the source offset.
pub fn iso_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Timezone-aware instant converted to UTC.
pub fn to_utc<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> DateTime<Utc> {
    timestamp.with_timezone(&Utc)
}

/// Naive wall-clock time interpreted as UTC.
pub fn assume_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn test_round2() {
        assert_eq!(round2(15.789473), 15.79);
        assert_eq!(round2(-3.14159), -3.14);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_to_utc_converts_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2024, 3, 1, 22, 0, 0).unwrap();
        let utc = to_utc(&local);
        assert_eq!(iso_date(&utc), "2024-03-02");
    }

    #[test]
    fn test_iso_date_uses_utc_calendar_day() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let midnight = tokyo.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(iso_date(&to_utc(&midnight)), "2024-02-29");

        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        let midnight = new_york.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(iso_date(&to_utc(&midnight)), "2024-03-01");
    }

    #[test]
    fn test_assume_utc_keeps_wall_clock() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(assume_utc(naive).to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }
}
