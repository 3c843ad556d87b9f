//! Symbolic look-back periods ("1d", "3m", "1y", ...) and their cutoff instants.
//!
//! Durations are fixed day counts (30-day month, 91-day quarter, 365-day year),
//! not calendar arithmetic, so the same token always moves the cutoff by the same amount.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Period {
    #[default]
    OneDay,
    OneWeek,
    SevenDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    ThreeYears,
    FourYears,
    FiveYears,
}

impl Period {
    pub const ALL: [Period; 11] = [
        Period::OneDay,
        Period::OneWeek,
        Period::SevenDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::ThreeYears,
        Period::FourYears,
        Period::FiveYears,
    ];

    /// Case-insensitive token lookup. Unknown tokens fall back to one day.
    pub fn parse(token: &str) -> Period {
        match token.trim().to_lowercase().as_str() {
            "1d" => Period::OneDay,
            "1w" => Period::OneWeek,
            "7d" => Period::SevenDays,
            "1m" => Period::OneMonth,
            "3m" => Period::ThreeMonths,
            "6m" => Period::SixMonths,
            "1y" => Period::OneYear,
            "2y" => Period::TwoYears,
            "3y" => Period::ThreeYears,
            "4y" => Period::FourYears,
            "5y" => Period::FiveYears,
            other => {
                tracing::debug!(token = %other, "Unrecognized period token, using 1d");
                Period::OneDay
            }
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::OneWeek => "1w",
            Period::SevenDays => "7d",
            Period::OneMonth => "1m",
            Period::ThreeMonths => "3m",
            Period::SixMonths => "6m",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::ThreeYears => "3y",
            Period::FourYears => "4y",
            Period::FiveYears => "5y",
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Period::OneDay => 1,
            Period::OneWeek | Period::SevenDays => 7,
            Period::OneMonth => 30,
            Period::ThreeMonths => 91,
            Period::SixMonths => 182,
            Period::OneYear => 365,
            Period::TwoYears => 365 * 2,
            Period::ThreeYears => 365 * 3,
            Period::FourYears => 365 * 4,
            Period::FiveYears => 365 * 5,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::days(self.days())
    }

    /// Start of the window that ends at `reference`.
    pub fn cutoff(self, reference: DateTime<Utc>) -> DateTime<Utc> {
        reference - self.duration()
    }
}

impl From<&str> for Period {
    fn from(token: &str) -> Self {
        Period::parse(token)
    }
}

impl From<String> for Period {
    fn from(token: String) -> Self {
        Period::parse(&token)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.token().to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Cutoff instant for `token` counted back from `reference` (now if `None`).
///
/// Callers holding naive or offset timestamps convert them with
/// [`shared::utils::assume_utc`] / [`shared::utils::to_utc`] first.
pub fn resolve(token: &str, reference: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let reference = reference.unwrap_or_else(Utc::now);
    Period::parse(token).cutoff(reference)
}
