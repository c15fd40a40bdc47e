//! Resolution of period tokens into date ranges
//!
//! Named periods (`day`, `week`/`w`, `month`, `mtd`/`m`, `year`, `ytd`/`y`) are
//! anchored on the reference date. Anything else is read as an explicit range
//! `A[:B]`, where `B` may be a date spec, a day of the month (`20`), or a signed
//! day offset from `A` (`+6`, `-3`).

use super::calendar::{first_of_month, first_of_year, Calendar, MAX_STEP_DAYS};
use super::spec::parse_date_spec;
use crate::error::{Result, TrackError};
use crate::types::{CanonicalDate, DateRange};
use chrono::{TimeZone, Weekday};
use tracing::{debug, warn};

/// Everything a period needs besides its token
pub struct PeriodContext<'a, Tz: TimeZone> {
    pub calendar: &'a Calendar<Tz>,
    /// Anchor for relative date specs such as `2d`
    pub today: CanonicalDate,
    /// Anchor for named periods
    pub reference: CanonicalDate,
    /// Configured first day of the week, unparsed
    pub week_start: &'a str,
}

/// Resolve `period`, falling back to the reference day when it cannot be resolved
pub fn resolve<Tz: TimeZone>(period: &str, ctx: &PeriodContext<'_, Tz>) -> DateRange {
    match try_resolve(period, ctx) {
        Ok(range) => {
            debug!("period '{}' resolved to {}", period, range);
            range
        }
        Err(e) => {
            warn!("{}; using {}", e, ctx.reference);
            DateRange::single(ctx.reference.clone())
        }
    }
}

pub fn try_resolve<Tz: TimeZone>(period: &str, ctx: &PeriodContext<'_, Tz>) -> Result<DateRange> {
    let cal = ctx.calendar;
    let reference = &ctx.reference;
    let range = match period.trim() {
        "" | "day" => Ok(DateRange::single(reference.clone())),
        "week" | "w" => {
            let start = parse_weekday(ctx.week_start)
                .ok_or_else(|| unresolved(period, format!("invalid week start '{}'", ctx.week_start)))?;
            cal.prev_weekday(reference, start).and_then(|from| {
                let to = cal.apply_offset(&from, 6)?;
                Ok(DateRange::new(from, to))
            })
        }
        "month" => cal.month_range(reference),
        "mtd" | "m" => first_of_month(reference).map(|from| DateRange::new(from, reference.clone())),
        "year" => cal.year_range(reference),
        "ytd" | "y" => first_of_year(reference).map(|from| DateRange::new(from, reference.clone())),
        explicit => return resolve_explicit(explicit, ctx),
    };
    range.map_err(|e| unresolved(period, e.to_string()))
}

fn resolve_explicit<Tz: TimeZone>(spec: &str, ctx: &PeriodContext<'_, Tz>) -> Result<DateRange> {
    let cal = ctx.calendar;
    let fail = |e: TrackError| unresolved(spec, e.to_string());
    let (start, end) = match spec.split_once(':') {
        Some((a, b)) => (a, Some(b.trim())),
        None => (spec, None),
    };
    let start = parse_date_spec(start, &ctx.today, cal).map_err(fail)?;

    let Some(end) = end else {
        return Ok(DateRange::single(start));
    };

    if end.starts_with(['+', '-']) {
        let offset: i64 = end
            .parse()
            .ok()
            .filter(|n: &i64| n.abs() <= MAX_STEP_DAYS)
            .ok_or_else(|| unresolved(spec, format!("bad day offset '{}'", end)))?;
        let other = cal.apply_offset(&start, offset).map_err(fail)?;
        return Ok(DateRange::new(start, other));
    }

    if !end.is_empty() && end.chars().all(|c| c.is_ascii_digit()) {
        let day: u32 = end
            .parse()
            .ok()
            .filter(|d| (1..=31).contains(d))
            .ok_or_else(|| unresolved(spec, format!("no day {} in any month", end)))?;
        let other = day_of_month_from(cal, &start, day).map_err(fail)?;
        return Ok(DateRange::new(start, other));
    }

    let end = parse_date_spec(end, &ctx.today, cal).map_err(fail)?;
    Ok(DateRange::new(start, end))
}

/// Step forward from `start` (inclusive) to the first date whose day of month is `day`
fn day_of_month_from<Tz: TimeZone>(
    cal: &Calendar<Tz>,
    start: &CanonicalDate,
    day: u32,
) -> Result<CanonicalDate> {
    let mut current = start.clone();
    // Any day 1..=31 occurs within two months
    for _ in 0..62 {
        if current.day() == day {
            break;
        }
        current = cal.next_date(&current)?;
    }
    Ok(current)
}

/// Weekday from a name (`mon`, `Monday`, any case) or a digit with 0 = Sunday
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u8>() {
        return match n {
            0 => Some(Weekday::Sun),
            1..=6 => Weekday::try_from(n - 1).ok(),
            _ => None,
        };
    }
    s.parse::<Weekday>().ok()
}

fn unresolved(period: &str, reason: impl Into<String>) -> TrackError {
    TrackError::RangeResolution {
        period: period.to_string(),
        reason: reason.into(),
    }
}
