use chrono::{DateTime, Utc};
use shared::utils::iso_date;
use std::collections::BTreeMap;

/// Date of the most recent bullish crossover of `short` over `long`.
///
/// The series are joined on timestamps where both have a finite value. A crossover is
/// an aligned point where `short > long` and the previous aligned point had `short <= long`.
pub fn last_upward_crossover(
    short: &[(DateTime<Utc>, Option<f64>)],
    long: &[(DateTime<Utc>, Option<f64>)],
) -> Option<String> {
    let long_by_time: BTreeMap<DateTime<Utc>, f64> = long
        .iter()
        .filter_map(|&(ts, v)| v.filter(|x| x.is_finite()).map(|x| (ts, x)))
        .collect();

    let mut aligned: Vec<(DateTime<Utc>, f64, f64)> = short
        .iter()
        .filter_map(|&(ts, s)| {
            let s = s.filter(|x| x.is_finite())?;
            let l = *long_by_time.get(&ts)?;
            Some((ts, s, l))
        })
        .collect();
    aligned.sort_by_key(|&(ts, _, _)| ts);

    if aligned.len() < 2 {
        return None;
    }

    aligned
        .windows(2)
        .rev()
        .find(|w| w[1].1 > w[1].2 && w[0].1 <= w[0].2)
        .map(|w| iso_date(&w[1].0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn column(values: &[Option<f64>]) -> Vec<(DateTime<Utc>, Option<f64>)> {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (start + Duration::days(i as i64), v))
            .collect()
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_single_crossover_detected() {
        let short = column(&some(&[1.0, 1.0, 3.0, 1.0]));
        let long = column(&some(&[2.0, 2.0, 2.0, 2.0]));
        assert_eq!(last_upward_crossover(&short, &long), Some("2024-05-03".to_string()));
    }

    #[test]
    fn test_returns_most_recent_crossover() {
        let short = column(&some(&[1.0, 3.0, 1.0, 3.0, 4.0]));
        let long = column(&some(&[2.0; 5]));
        assert_eq!(last_upward_crossover(&short, &long), Some("2024-05-04".to_string()));
    }

    #[test]
    fn test_touching_then_above_counts() {
        let short = column(&some(&[2.0, 2.5]));
        let long = column(&some(&[2.0, 2.0]));
        assert_eq!(last_upward_crossover(&short, &long), Some("2024-05-02".to_string()));
    }

    #[test]
    fn test_downward_crossings_are_ignored() {
        let short = column(&some(&[3.0, 3.0, 1.0, 1.0]));
        let long = column(&some(&[2.0; 4]));
        assert_eq!(last_upward_crossover(&short, &long), None);
    }

    #[test]
    fn test_always_above_is_not_a_crossover() {
        let short = column(&some(&[5.0, 6.0, 7.0]));
        let long = column(&some(&[1.0, 1.0, 1.0]));
        assert_eq!(last_upward_crossover(&short, &long), None);
    }

    #[test]
    fn test_alignment_skips_absent_values() {
        // Day 2 is absent in `long`; the crossover is judged against day 1.
        let short = column(&some(&[1.0, 0.5, 3.0]));
        let long = column(&[Some(2.0), None, Some(2.0)]);
        assert_eq!(last_upward_crossover(&short, &long), Some("2024-05-03".to_string()));
    }

    #[test]
    fn test_insufficient_aligned_points() {
        let short = column(&some(&[1.0, 3.0]));
        let long = column(&[None, Some(2.0)]);
        assert_eq!(last_upward_crossover(&short, &long), None);
        assert_eq!(last_upward_crossover(&[], &[]), None);
    }
}
