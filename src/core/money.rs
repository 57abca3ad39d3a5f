//! Parsing of free-text money amounts and display formatting for the report.
//!
//! Every formatter takes an `Option` so that "not computable" renders as the
//! same placeholder everywhere.

use num_format::{Locale, ToFormattedString};

/// Shown in place of any value that could not be computed.
pub const PLACEHOLDER: &str = "—";

/// Parses a money amount typed by the user.
///
/// Dollar signs, thousands separators and spaces are removed wherever they
/// appear, then the remainder must be a finite real number. Anything else,
/// including an empty field, is `None`.
pub fn parse_money(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Formats an amount as USD, e.g. `-$1,234.50`.
pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(n) if n.is_finite() => {
            let sign = if n < 0.0 { "-" } else { "" };
            let magnitude = n.abs();
            let amount = match to_hundredths(magnitude) {
                Some(cents) => format!(
                    "{}.{:02}",
                    (cents / 100).to_formatted_string(&Locale::en),
                    cents % 100
                ),
                None => format!("{magnitude:.2}"),
            };
            format!("{sign}${amount}")
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// Formats a ratio as a percentage with two decimals, e.g. `0.1` as `10.00%`.
pub fn format_percent(value: Option<f64>) -> String {
    match value.map(|n| n * 100.0) {
        Some(pct) if pct.is_finite() => {
            let sign = if pct < 0.0 { "-" } else { "" };
            let magnitude = pct.abs();
            match to_hundredths(magnitude) {
                Some(hundredths) => {
                    format!("{sign}{}.{:02}%", hundredths / 100, hundredths % 100)
                }
                None => format!("{sign}{magnitude:.2}%"),
            }
        }
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_days(value: Option<i64>) -> String {
    value.map_or(PLACEHOLDER.to_string(), |d| d.to_string())
}

pub fn format_years(value: Option<f64>) -> String {
    match value {
        Some(y) if y.is_finite() => format!("{y:.4}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Rounds a non-negative value to hundredths, to nearest with ties away from
/// zero. `None` when the result does not fit in a `u128`.
///
/// A double lies exactly halfway between two hundredths only when it is an odd
/// number of eighths, and then its exact decimal form has three places.
fn to_hundredths(magnitude: f64) -> Option<u128> {
    let eighths = magnitude * 8.0;
    let tie = eighths.fract() == 0.0 && eighths % 2.0 == 1.0;
    if tie {
        let thousandths: u128 = format!("{magnitude:.3}").replace('.', "").parse().ok()?;
        Some((thousandths + 5) / 10)
    } else {
        format!("{magnitude:.2}").replace('.', "").parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_decorated_amounts() {
        assert_eq!(parse_money("10000"), Some(10000.0));
        assert_eq!(parse_money("$10,000.50"), Some(10000.5));
        assert_eq!(parse_money(" $ 1 234 "), Some(1234.0));
        assert_eq!(parse_money("-$500"), Some(-500.0));
        assert_eq!(parse_money("-1,250.25"), Some(-1250.25));
        assert_eq!(parse_money("1e3"), Some(1000.0));
        assert_eq!(parse_money("\t42\n"), Some(42.0));
    }

    #[test]
    fn rejects_empty_and_malformed_amounts() {
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("   "), None);
        assert_eq!(parse_money("$,"), None);
        assert_eq!(parse_money("12abc"), None);
        assert_eq!(parse_money("-"), None);
        assert_eq!(parse_money("€100"), None);
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert_eq!(parse_money("inf"), None);
        assert_eq!(parse_money("NaN"), None);
        assert_eq!(parse_money("1e400"), None);
    }

    #[test]
    fn formats_money_with_grouping_and_sign() {
        assert_eq!(format_money(Some(1000.0)), "$1,000.00");
        assert_eq!(format_money(Some(1234567.891)), "$1,234,567.89");
        assert_eq!(format_money(Some(-1234.5)), "-$1,234.50");
        assert_eq!(format_money(Some(0.0)), "$0.00");
        assert_eq!(format_money(Some(999.999)), "$1,000.00");
        assert_eq!(format_money(Some(123.0)), "$123.00");
        assert_eq!(format_money(Some(-0.001)), "-$0.00");
    }

    #[test]
    fn rounds_exact_halves_away_from_zero() {
        assert_eq!(format_money(Some(0.125)), "$0.13");
        assert_eq!(format_money(Some(0.375)), "$0.38");
        assert_eq!(format_money(Some(-2.625)), "-$2.63");
        assert_eq!(format_money(Some(1_000_000.875)), "$1,000,000.88");
        // 1.005 is stored just below the half
        assert_eq!(format_money(Some(1.005)), "$1.00");
        assert_eq!(format_percent(Some(0.00125)), "0.13%");
        assert_eq!(format_percent(Some(-0.00375)), "-0.38%");
    }

    #[test]
    fn formats_amounts_beyond_grouping_range_ungrouped() {
        assert_eq!(format_money(Some(1e40)), format!("${:.2}", 1e40));
        assert_eq!(format_money(Some(-1e300)), format!("-${:.2}", 1e300));
        assert_eq!(format_percent(Some(1e300)), format!("{:.2}%", 1e302));
        assert_eq!(format_percent(Some(f64::MAX)), PLACEHOLDER);
    }

    #[test]
    fn formats_missing_values_as_placeholder() {
        assert_eq!(format_money(None), PLACEHOLDER);
        assert_eq!(format_money(Some(f64::NAN)), PLACEHOLDER);
        assert_eq!(format_percent(None), PLACEHOLDER);
        assert_eq!(format_percent(Some(f64::INFINITY)), PLACEHOLDER);
        assert_eq!(format_days(None), PLACEHOLDER);
        assert_eq!(format_years(None), PLACEHOLDER);
    }

    #[test]
    fn formats_percentages_and_periods() {
        assert_eq!(format_percent(Some(0.1)), "10.00%");
        assert_eq!(format_percent(Some(-0.0525)), "-5.25%");
        assert_eq!(format_percent(Some(0.0)), "0.00%");
        assert_eq!(format_percent(Some(-0.0)), "0.00%");
        assert_eq!(format_percent(Some(1.0)), "100.00%");
        assert_eq!(format_days(Some(-3)), "-3");
        assert_eq!(format_years(Some(365.0 / 365.2425)), "0.9993");
    }
}
