//! Day arithmetic on canonical dates
//!
//! Every step between days goes through local noon: a date is turned into the
//! instant 12:00 in the calendar's zone, shifted by 24 hours, and read back as
//! a date. A daylight-saving shift of up to twelve hours on that day still lands
//! on the neighbouring calendar date, where midnight-anchored arithmetic would
//! skip or repeat one.

use crate::error::{Result, TrackError};
use crate::types::{CanonicalDate, DateRange};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc, Weekday};

/// Largest day offset accepted from user input; each day is one step
pub const MAX_STEP_DAYS: i64 = 36_600;

/// Date arithmetic bound to a time zone
///
/// Every operation that can step past 0000-01-01 or 9999-12-31 returns
/// [`TrackError::OutOfRange`] instead of a date that no longer fits `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct Calendar<Tz: TimeZone> {
    tz: Tz,
}

impl Calendar<Local> {
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl<Tz: TimeZone> Calendar<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The calendar date of `now` in this zone
    pub fn today(&self, now: DateTime<Utc>) -> Result<CanonicalDate> {
        let date = now.with_timezone(&self.tz).date_naive();
        CanonicalDate::from_naive(date).ok_or_else(|| TrackError::OutOfRange(date.to_string()))
    }

    /// Shift `date` by `hours` starting from local noon
    fn shift_from_noon(&self, date: &CanonicalDate, hours: i64) -> Result<CanonicalDate> {
        let day = date.naive();
        let noon = self
            .tz
            .with_ymd_and_hms(day.year(), day.month(), day.day(), 12, 0, 0)
            .earliest();
        let shifted = match noon {
            Some(noon) => (noon + Duration::hours(hours)).date_naive(),
            // No zone skips its noon; fall back to plain date arithmetic if one does
            None => day + Duration::days(hours / 24),
        };
        CanonicalDate::from_naive(shifted).ok_or_else(|| {
            let direction = if hours > 0 { "day after" } else { "day before" };
            TrackError::OutOfRange(format!("the {} {}", direction, date))
        })
    }

    pub fn next_date(&self, date: &CanonicalDate) -> Result<CanonicalDate> {
        self.shift_from_noon(date, 24)
    }

    pub fn prev_date(&self, date: &CanonicalDate) -> Result<CanonicalDate> {
        self.shift_from_noon(date, -24)
    }

    /// Step `|days|` times forward (positive) or backward (negative)
    pub fn apply_offset(&self, date: &CanonicalDate, days: i64) -> Result<CanonicalDate> {
        let mut current = date.clone();
        for _ in 0..days.unsigned_abs() {
            current = if days > 0 {
                self.next_date(&current)?
            } else {
                self.prev_date(&current)?
            };
        }
        Ok(current)
    }

    /// Most recent date on or before `date` falling on `weekday`
    pub fn prev_weekday(&self, date: &CanonicalDate, weekday: Weekday) -> Result<CanonicalDate> {
        let mut current = date.clone();
        while current.naive().weekday() != weekday {
            current = self.prev_date(&current)?;
        }
        Ok(current)
    }

    /// First to last day of the month containing `date`
    pub fn month_range(&self, date: &CanonicalDate) -> Result<DateRange> {
        let first = first_of_month(date)?;
        // December ends on the 31st; stepping back from next January would leave 9999
        let last = if date.month() == 12 {
            ymd(date.year(), 12, 31)?
        } else {
            self.prev_date(&ymd(date.year(), date.month() + 1, 1)?)?
        };
        Ok(DateRange::new(first, last))
    }

    /// Jan 1 to Dec 31 of the year containing `date`
    pub fn year_range(&self, date: &CanonicalDate) -> Result<DateRange> {
        Ok(DateRange::new(first_of_year(date)?, ymd(date.year(), 12, 31)?))
    }

    /// Every day of `range`, in order
    pub fn expand_range(&self, range: &DateRange) -> Result<Vec<CanonicalDate>> {
        let mut days = vec![range.from.clone()];
        let mut current = range.from.clone();
        while current < range.to {
            current = self.next_date(&current)?;
            days.push(current.clone());
        }
        Ok(days)
    }
}

pub fn first_of_month(date: &CanonicalDate) -> Result<CanonicalDate> {
    ymd(date.year(), date.month(), 1)
}

pub fn first_of_year(date: &CanonicalDate) -> Result<CanonicalDate> {
    ymd(date.year(), 1, 1)
}

fn ymd(year: i32, month: u32, day: u32) -> Result<CanonicalDate> {
    CanonicalDate::from_ymd(year, month, day)
        .ok_or_else(|| TrackError::OutOfRange(format!("{:04}-{:02}-{:02}", year, month, day)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;
    use chrono_tz::Australia::Lord_Howe;
    use proptest::prelude::*;

    fn d(s: &str) -> CanonicalDate {
        CanonicalDate::parse(s).unwrap()
    }

    fn is_leap(year: i32) -> bool {
        NaiveDate::from_ymd_opt(year, 2, 29).is_some()
    }

    #[test]
    fn test_next_date_crosses_month_and_year() {
        let cal = Calendar::new(Utc);
        assert_eq!(cal.next_date(&d("2024-01-31")).unwrap(), d("2024-02-01"));
        assert_eq!(cal.next_date(&d("2024-02-28")).unwrap(), d("2024-02-29"));
        assert_eq!(cal.next_date(&d("2023-02-28")).unwrap(), d("2023-03-01"));
        assert_eq!(cal.next_date(&d("2024-12-31")).unwrap(), d("2025-01-01"));
    }

    #[test]
    fn test_next_date_across_dst_transitions() {
        let cal = Calendar::new(New_York);
        // 2024-03-10 spring forward, 2024-11-03 fall back
        assert_eq!(cal.next_date(&d("2024-03-09")).unwrap(), d("2024-03-10"));
        assert_eq!(cal.next_date(&d("2024-03-10")).unwrap(), d("2024-03-11"));
        assert_eq!(cal.next_date(&d("2024-11-02")).unwrap(), d("2024-11-03"));
        assert_eq!(cal.next_date(&d("2024-11-03")).unwrap(), d("2024-11-04"));
        assert_eq!(cal.prev_date(&d("2024-03-11")).unwrap(), d("2024-03-10"));
        assert_eq!(cal.prev_date(&d("2024-11-04")).unwrap(), d("2024-11-03"));
    }

    #[test]
    fn test_expand_range_over_dst_has_no_gaps() {
        let cal = Calendar::new(Lord_Howe);
        let days = cal.expand_range(&DateRange::new(d("2024-03-30"), d("2024-04-10"))).unwrap();
        assert_eq!(days.len(), 12);
        for pair in days.windows(2) {
            assert_eq!(pair[0].naive().succ_opt().unwrap(), pair[1].naive());
        }
    }

    #[test]
    fn test_month_range() {
        let cal = Calendar::new(Utc);
        assert_eq!(cal.month_range(&d("2024-02-10")).unwrap(), DateRange::new(d("2024-02-01"), d("2024-02-29")));
        assert_eq!(cal.month_range(&d("2023-12-25")).unwrap(), DateRange::new(d("2023-12-01"), d("2023-12-31")));
        assert_eq!(cal.month_range(&d("2024-04-30")).unwrap(), DateRange::new(d("2024-04-01"), d("2024-04-30")));
    }

    #[test]
    fn test_year_range() {
        let cal = Calendar::new(Utc);
        assert_eq!(cal.year_range(&d("2024-06-15")).unwrap(), DateRange::new(d("2024-01-01"), d("2024-12-31")));
    }

    #[test]
    fn test_prev_weekday() {
        let cal = Calendar::new(Utc);
        // 2024-03-15 is a Friday
        assert_eq!(cal.prev_weekday(&d("2024-03-15"), Weekday::Fri).unwrap(), d("2024-03-15"));
        assert_eq!(cal.prev_weekday(&d("2024-03-15"), Weekday::Mon).unwrap(), d("2024-03-11"));
        assert_eq!(cal.prev_weekday(&d("2024-03-15"), Weekday::Sun).unwrap(), d("2024-03-10"));
        assert_eq!(cal.prev_weekday(&d("2024-03-15"), Weekday::Sat).unwrap(), d("2024-03-09"));
    }

    #[test]
    fn test_apply_offset() {
        let cal = Calendar::new(New_York);
        assert_eq!(cal.apply_offset(&d("2024-03-08"), 3).unwrap(), d("2024-03-11"));
        assert_eq!(cal.apply_offset(&d("2024-03-01"), -1).unwrap(), d("2024-02-29"));
        assert_eq!(cal.apply_offset(&d("2024-03-01"), 0).unwrap(), d("2024-03-01"));
    }

    #[test]
    fn test_today_uses_zone() {
        let cal = Calendar::new(New_York);
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 2, 0, 0).unwrap();
        assert_eq!(cal.today(now).unwrap(), d("2024-03-14"));
    }

    #[test]
    fn test_steps_stop_at_the_four_digit_years() {
        let cal = Calendar::new(Utc);
        assert!(matches!(cal.next_date(&d("9999-12-31")), Err(TrackError::OutOfRange(_))));
        assert!(matches!(cal.prev_date(&d("0000-01-01")), Err(TrackError::OutOfRange(_))));
        assert!(cal.apply_offset(&d("9999-12-30"), 2).is_err());
        assert!(cal.apply_offset(&d("0000-01-02"), -2).is_err());
        assert_eq!(cal.apply_offset(&d("9999-12-30"), 1).unwrap(), d("9999-12-31"));
        assert_eq!(cal.apply_offset(&d("0000-01-02"), -1).unwrap(), d("0000-01-01"));
        // 0000-01-01 was a Saturday in the proleptic Gregorian calendar
        assert!(cal.prev_weekday(&d("0000-01-01"), Weekday::Sun).is_err());
    }

    #[test]
    fn test_month_and_year_ranges_at_the_edges() {
        let cal = Calendar::new(New_York);
        assert_eq!(cal.month_range(&d("9999-12-15")).unwrap(), DateRange::new(d("9999-12-01"), d("9999-12-31")));
        assert_eq!(cal.month_range(&d("0000-01-15")).unwrap(), DateRange::new(d("0000-01-01"), d("0000-01-31")));
        assert_eq!(cal.year_range(&d("9999-06-01")).unwrap(), DateRange::new(d("9999-01-01"), d("9999-12-31")));
        assert_eq!(cal.expand_range(&cal.month_range(&d("9999-12-15")).unwrap()).unwrap().len(), 31);
    }

    proptest! {
        #[test]
        fn prop_steps_near_the_edges_stay_canonical(back in 0i64..400, offset in -400i64..400) {
            let cal = Calendar::new(New_York);
            for anchor in [d("9999-12-31"), d("0000-01-01")] {
                let start = if anchor.year() == 9999 { -back } else { back };
                let Ok(date) = cal.apply_offset(&anchor, start) else { continue };
                for produced in [
                    cal.apply_offset(&date, offset),
                    cal.next_date(&date),
                    cal.prev_date(&date),
                    cal.month_range(&date).map(|r| r.from),
                    cal.month_range(&date).map(|r| r.to),
                    cal.year_range(&date).map(|r| r.to),
                ]
                .into_iter()
                .flatten()
                {
                    prop_assert_eq!(produced.as_str().len(), 10);
                    prop_assert!(CanonicalDate::parse(produced.as_str()).is_some());
                }
                let month = cal.month_range(&date).unwrap();
                prop_assert!(month.from <= month.to);
                prop_assert_eq!(month.from.month(), date.month());
                prop_assert_eq!(month.to.month(), date.month());
            }
        }

        #[test]
        fn prop_full_year_of_steps(year in 1970i32..2100) {
            let cal = Calendar::new(New_York);
            let steps = if is_leap(year) { 365 } else { 364 };
            let start = CanonicalDate::from_ymd(year, 1, 1).unwrap();
            let end = cal.apply_offset(&start, steps).unwrap();
            prop_assert_eq!(end, CanonicalDate::from_ymd(year, 12, 31).unwrap());
            let after = cal.next_date(&CanonicalDate::from_ymd(year, 12, 31).unwrap()).unwrap();
            prop_assert_eq!(after, CanonicalDate::from_ymd(year + 1, 1, 1).unwrap());
        }

        #[test]
        fn prop_prev_weekday_within_a_week(days in 0i64..40_000, w in 0u8..7) {
            let cal = Calendar::new(Utc);
            let date = CanonicalDate::from_naive(
                NaiveDate::from_ymd_opt(1950, 1, 1).unwrap() + Duration::days(days),
            )
            .unwrap();
            let weekday = Weekday::try_from(w).unwrap();
            let found = cal.prev_weekday(&date, weekday).unwrap();
            prop_assert!(found <= date);
            prop_assert_eq!(found.naive().weekday(), weekday);
            prop_assert!((date.naive() - found.naive()).num_days() < 7);
        }

        #[test]
        fn prop_expand_range_length(days in 0i64..20_000, span in 0i64..400) {
            let cal = Calendar::new(New_York);
            let from = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap() + Duration::days(days);
            let to = from + Duration::days(span);
            let expanded = cal.expand_range(&DateRange::new(
                CanonicalDate::from_naive(from).unwrap(),
                CanonicalDate::from_naive(to).unwrap(),
            )).unwrap();
            prop_assert_eq!(expanded.len() as i64, span + 1);
            prop_assert!(expanded.windows(2).all(|p| p[0] < p[1]));
        }
    }
}
