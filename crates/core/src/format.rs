//! Display formatting for dates, money, percentages and ids.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// `MM-DD-YYYY`.
#[must_use]
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.format("%m-%d-%Y").to_string()
}

/// `MM-DD-YYYY H:MM AM/PM` on a 12-hour clock.
#[must_use]
pub fn format_date_time(instant: DateTime<Utc>) -> String {
    instant.format("%m-%d-%Y %-I:%M %p").to_string()
}

/// `$x.xx`, with `$0.00` for a missing amount. The sign follows the dollar
/// sign: `$-2.50`.
#[must_use]
pub fn format_currency(amount: Option<Decimal>) -> String {
    let amount = amount
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${amount:.2}")
}

/// One decimal place plus `%`. Missing or non-finite values render as `0%`.
#[must_use]
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => "0%".to_owned(),
    }
}

/// Shorten 24-character hex ids to `...` plus their last 8 characters.
///
/// Anything else is returned unchanged, and a blank id renders as `N/A`.
#[must_use]
pub fn format_id(id: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        return "N/A".to_owned();
    }
    if id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit()) {
        if let Some(tail) = id.get(16..) {
            return format!("...{tail}");
        }
    }
    id.to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 7, 15, 4, 0).unwrap();
        assert_eq!(format_date(instant), "03-07-2024");
        assert_eq!(format_date_time(instant), "03-07-2024 3:04 PM");

        let morning = Utc.with_ymd_and_hms(2024, 12, 25, 0, 30, 0).unwrap();
        assert_eq!(format_date_time(morning), "12-25-2024 12:30 AM");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some(Decimal::new(129_999, 2))), "$1299.99");
        assert_eq!(format_currency(Some(Decimal::new(5, 0))), "$5.00");
        assert_eq!(format_currency(Some(Decimal::new(12_345, 3))), "$12.35");
        assert_eq!(format_currency(None), "$0.00");
        assert_eq!(format_currency(Some(Decimal::new(-250, 2))), "$-2.50");
        assert_eq!(format_currency(Some(Decimal::new(-1, 0))), "$-1.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(Some(12.345)), "12.3%");
        assert_eq!(format_percentage(None), "0%");
        assert_eq!(format_percentage(Some(f64::NAN)), "0%");
    }

    #[test]
    fn test_format_id() {
        assert_eq!(format_id("507f1f77bcf86cd799439011"), "...99439011");
        assert_eq!(format_id("42"), "42");
        assert_eq!(format_id("507F1F77BCF86CD7994390ZZ"), "507F1F77BCF86CD7994390ZZ");
        assert_eq!(format_id("  "), "N/A");
    }
}
