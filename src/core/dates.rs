//! Calendar arithmetic for the measured period.

use chrono::NaiveDate;

/// Mean length of a Gregorian year in days.
pub const DAYS_PER_YEAR: f64 = 365.2425;

/// Whole days from `start` to `end`. Negative when `end` precedes `start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Length of a period in Gregorian mean years.
pub fn years_from_days(days: i64) -> f64 {
    days as f64 / DAYS_PER_YEAR
}

/// Parses a form date in `YYYY-MM-DD` form. Blank or invalid text is `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_days_across_leap_years() {
        assert_eq!(days_between(date(2023, 1, 1), date(2024, 1, 1)), 365);
        assert_eq!(days_between(date(2024, 1, 1), date(2025, 1, 1)), 366);
        assert_eq!(days_between(date(2024, 3, 10), date(2024, 3, 10)), 0);
    }

    #[test]
    fn reversed_dates_give_negative_days() {
        assert_eq!(days_between(date(2024, 2, 1), date(2024, 1, 1)), -31);
        assert!(years_from_days(-31) < 0.0);
    }

    #[test]
    fn converts_days_to_mean_years() {
        assert!((years_from_days(365) - 0.999_336).abs() < 1e-6);
        assert!((years_from_days(3653) - 10.0016).abs() < 1e-4);
    }

    #[test]
    fn parses_only_calendar_dates() {
        assert_eq!(parse_date("2024-02-29"), Some(date(2024, 2, 29)));
        assert_eq!(parse_date(" 2024-01-05 "), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("01/05/2024"), None);
        assert_eq!(parse_date(""), None);
    }
}
