//! The operations the command line is built on
//!
//! A `Tracker` carries everything an invocation depends on (config, ledger,
//! calendar zone, clock) so nothing reads process-wide state.

use crate::aggregate::{build_report, Report};
use crate::config::Config;
use crate::dates::{parse_date_spec, resolve, Calendar, PeriodContext};
use crate::duration::{parse_duration_spec, DurationSpec};
use crate::error::{Result, TrackError};
use crate::ledger::{normalize_comment, Ledger};
use crate::types::{CanonicalDate, LedgerRow};
use crate::utils::time::{Clock, SystemClock};
use chrono::{Local, TimeZone};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Include the per-day breakdown
    pub full: bool,
    /// Drop zero-minute rows from every total
    pub billable_only: bool,
}

pub struct Tracker<Tz: TimeZone = Local> {
    config: Config,
    ledger: Ledger,
    calendar: Calendar<Tz>,
    clock: Box<dyn Clock>,
}

impl Tracker<Local> {
    /// Tracker on the system clock and local zone
    pub fn new(config: Config) -> Self {
        let ledger = Ledger::new(config.ledger_path());
        Self::with_parts(config, ledger, Calendar::local(), Box::new(SystemClock))
    }
}

impl<Tz: TimeZone> Tracker<Tz> {
    pub fn with_parts(config: Config, ledger: Ledger, calendar: Calendar<Tz>, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            ledger,
            calendar,
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn today(&self) -> Result<CanonicalDate> {
        self.calendar.today(self.clock.now())
    }

    /// Append an entry. The date defaults to today; `comment_words` are joined with spaces.
    pub fn record(
        &self,
        date_spec: Option<&str>,
        project: &str,
        duration: &str,
        comment_words: &[String],
    ) -> Result<LedgerRow> {
        if project.is_empty() || project.chars().any(char::is_whitespace) {
            return Err(TrackError::InvalidProject(project.to_string()));
        }

        let today = self.today()?;
        let date = match date_spec {
            Some(spec) => parse_date_spec(spec, &today, &self.calendar)?,
            None => today,
        };

        let minutes = match parse_duration_spec(duration)? {
            DurationSpec::Minutes(m) => m,
            DurationSpec::SinceLastWrite => {
                let elapsed = self
                    .ledger
                    .freshness(self.clock.as_ref())?
                    .ok_or_else(|| TrackError::NoLedger(self.ledger.path().to_path_buf()))?;
                u32::try_from(elapsed).unwrap_or(u32::MAX)
            }
        };

        let row = LedgerRow {
            date,
            project: project.to_string(),
            minutes,
            comment: normalize_comment(&comment_words.join(" ")),
        };
        self.ledger.append(&row)?;
        Ok(row)
    }

    /// Totals over `period`, anchored on `reference` (default today)
    pub fn report(&self, period: &str, reference: Option<&str>, options: ReportOptions) -> Result<Report> {
        let today = self.today()?;
        let reference = match reference {
            Some(spec) => parse_date_spec(spec, &today, &self.calendar)?,
            None => today.clone(),
        };

        let ctx = PeriodContext {
            calendar: &self.calendar,
            today,
            reference,
            week_start: &self.config.week_start,
        };
        let range = resolve(period, &ctx);
        let days = self.calendar.expand_range(&range)?;
        debug!("{} days in {}", days.len(), range);

        let rows = self.ledger.extract(&range)?;
        Ok(build_report(
            range,
            &days,
            &rows,
            &self.config.rates,
            !options.billable_only,
            options.full,
        ))
    }

    /// Minutes since the ledger was last written, `None` if it does not exist
    pub fn freshness(&self) -> Result<Option<i64>> {
        self.ledger.freshness(self.clock.as_ref())
    }

    pub fn reset_freshness(&self) -> Result<()> {
        self.ledger.touch(self.clock.as_ref())
    }
}
