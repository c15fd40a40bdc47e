//! Parsing of user-facing date tokens
//!
//! Recognized forms, first match wins:
//! - `2d`, `3 w`: that many days or weeks before today
//! - `2024-7-4`: year-month-day, padding optional
//! - `7/4/2024`: month/day/year
//! - `Jul 4 2024`: English month abbreviation, day, year
//!
//! Relative weekday phrases such as "last Tuesday" are not supported.

use super::calendar::{Calendar, MAX_STEP_DAYS};
use crate::error::{Result, TrackError};
use crate::types::CanonicalDate;
use chrono::TimeZone;
use once_cell::sync::Lazy;
use regex_lite::Regex;

static RELATIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*([dw])$").unwrap());
static ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());
static US: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());
static NAMED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][a-z]{2})\s+(\d{1,2}),?\s+(\d{4})$").unwrap());

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse `token` into a canonical date, with relative forms counted back from `today`
pub fn parse_date_spec<Tz: TimeZone>(
    token: &str,
    today: &CanonicalDate,
    calendar: &Calendar<Tz>,
) -> Result<CanonicalDate> {
    let token = token.trim();
    let invalid = || TrackError::InvalidDate(token.to_string());

    if let Some(caps) = RELATIVE.captures(token) {
        let count: i64 = caps[1].parse().map_err(|_| invalid())?;
        let days = if &caps[2] == "w" { count.saturating_mul(7) } else { count };
        if days > MAX_STEP_DAYS {
            return Err(invalid());
        }
        return calendar.apply_offset(today, -days).map_err(|_| invalid());
    }

    let parts = if let Some(caps) = ISO.captures(token) {
        numbers(&caps[1], &caps[2], &caps[3])
    } else if let Some(caps) = US.captures(token) {
        numbers(&caps[3], &caps[1], &caps[2])
    } else if let Some(caps) = NAMED.captures(token) {
        MONTHS
            .iter()
            .position(|m| *m == &caps[1])
            .and_then(|month| numbers(&caps[3], &(month + 1).to_string(), &caps[2]))
    } else {
        None
    };

    parts
        .and_then(|(year, month, day)| CanonicalDate::from_ymd(year, month, day))
        .ok_or_else(invalid)
}

fn numbers(year: &str, month: &str, day: &str) -> Option<(i32, u32, u32)> {
    Some((year.parse().ok()?, month.parse().ok()?, day.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parse(token: &str) -> Result<CanonicalDate> {
        let today = CanonicalDate::parse("2024-03-15").unwrap();
        parse_date_spec(token, &today, &Calendar::new(Utc))
    }

    fn ok(token: &str) -> String {
        parse(token).unwrap().to_string()
    }

    #[test]
    fn test_relative_days_and_weeks() {
        assert_eq!(ok("0d"), "2024-03-15");
        assert_eq!(ok("2d"), "2024-03-13");
        assert_eq!(ok("15 d"), "2024-02-29");
        assert_eq!(ok("1w"), "2024-03-08");
        assert_eq!(ok("3 w"), "2024-02-23");
    }

    #[test]
    fn test_iso_pads_components() {
        assert_eq!(ok("2024-07-04"), "2024-07-04");
        assert_eq!(ok("2024-7-4"), "2024-07-04");
        assert_eq!(ok("2024-12-31"), "2024-12-31");
    }

    #[test]
    fn test_us_form() {
        assert_eq!(ok("7/4/2024"), "2024-07-04");
        assert_eq!(ok("12/25/2023"), "2023-12-25");
    }

    #[test]
    fn test_month_name_form() {
        assert_eq!(ok("Jul 4 2024"), "2024-07-04");
        assert_eq!(ok("Feb 29, 2024"), "2024-02-29");
    }

    #[test]
    fn test_month_name_is_case_sensitive() {
        assert!(matches!(parse("jul 4 2024"), Err(TrackError::InvalidDate(_))));
        assert!(matches!(parse("JUL 4 2024"), Err(TrackError::InvalidDate(_))));
        assert!(matches!(parse("Jux 4 2024"), Err(TrackError::InvalidDate(_))));
    }

    #[test]
    fn test_rejects_impossible_and_unknown() {
        assert!(parse("2024-02-30").is_err());
        assert!(parse("13/1/2024").is_err());
        assert!(parse("last Tuesday").is_err());
        assert!(parse("15").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_relative_before_year_zero_is_rejected() {
        let today = CanonicalDate::parse("0000-01-05").unwrap();
        let cal = Calendar::new(Utc);
        assert_eq!(parse_date_spec("4d", &today, &cal).unwrap().as_str(), "0000-01-01");
        assert!(matches!(parse_date_spec("1w", &today, &cal), Err(TrackError::InvalidDate(_))));
    }

    #[test]
    fn test_error_names_token() {
        let err = parse("someday").unwrap_err();
        assert!(err.to_string().contains("'someday'"));
        assert!(err.is_parse());
    }
}
