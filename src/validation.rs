// Validation utilities module
// Domain-specific input checks shared by the handlers and services

use chrono::{Datelike, NaiveDate, Utc};
use validator::ValidationError;

/// Parse a booking date from its wire representation.
///
/// Two formats are accepted: ISO `YYYY-MM-DD`, and a bare day-of-month
/// resolved against the current month and year. The bare form is a
/// compatibility shim kept for legacy clients; it is ambiguous around month
/// boundaries and must not be extended.
pub fn parse_booking_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(day) = raw.parse::<u32>() {
        let today = Utc::now().date_naive();
        if let Some(date) = NaiveDate::from_ymd_opt(today.year(), today.month(), day) {
            return Ok(date);
        }
    }

    Err(ValidationError::new("invalid_date"))
}

/// Validates that a feedback rating is an integer between 1 and 5
pub fn validate_rating_range(rating: i16) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::new("rating_out_of_range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_booking_date("2025-04-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_iso_date_with_whitespace() {
        assert_eq!(
            parse_booking_date(" 2025-04-15 ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_bare_day_resolves_to_current_month() {
        // The legacy shim interprets "15" as the 15th of the current month.
        let today = Utc::now().date_naive();
        let parsed = parse_booking_date("15").unwrap();
        assert_eq!(parsed.year(), today.year());
        assert_eq!(parsed.month(), today.month());
        assert_eq!(parsed.day(), 15);
    }

    #[test]
    fn test_parse_bare_day_is_ambiguous_across_months() {
        // Flagging the known shim ambiguity: a bare "1" sent just before
        // midnight on the last day of a month resolves to the *current*
        // month's 1st, i.e. a date in the past. The shim does not try to be
        // clever about this.
        let today = Utc::now().date_naive();
        let parsed = parse_booking_date("1").unwrap();
        assert_eq!(parsed.month(), today.month());
    }

    #[test]
    fn test_parse_bare_day_out_of_range() {
        assert!(parse_booking_date("32").is_err());
        assert!(parse_booking_date("0").is_err());
    }

    #[test]
    fn test_parse_garbage_date() {
        assert!(parse_booking_date("tomorrow").is_err());
        assert!(parse_booking_date("2025/04/15").is_err());
        assert!(parse_booking_date("").is_err());
    }

    #[test]
    fn test_rating_range() {
        for valid in 1..=5 {
            assert!(validate_rating_range(valid).is_ok());
        }
        assert!(validate_rating_range(0).is_err());
        assert!(validate_rating_range(6).is_err());
        assert!(validate_rating_range(-3).is_err());
    }
}
