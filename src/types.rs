//! Core types for timetrack

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A calendar day rendered as `YYYY-MM-DD`
///
/// Ordering is the string ordering, which for this fixed-width form is also
/// chronological order. Only years 0000 through 9999 fit the form, so no
/// constructor produces a date outside them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CanonicalDate {
    text: String,
    date: NaiveDate,
}

impl CanonicalDate {
    pub const MIN_YEAR: i32 = 0;
    pub const MAX_YEAR: i32 = 9999;

    /// Build from explicit components, zero-padding to 4/2/2 digits.
    /// Returns `None` for a day that does not exist or a year outside 0000..=9999.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::from_naive)
    }

    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&date.year()) {
            return None;
        }
        Some(Self {
            text: format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()),
            date,
        })
    }

    /// Accept a string that is already canonical (exact width, real day)
    pub fn parse(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
            return None;
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
        Self::from_naive(date).filter(|canonical| canonical.text == s)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn naive(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

impl From<CanonicalDate> for String {
    fn from(date: CanonicalDate) -> Self {
        date.text
    }
}

impl TryFrom<String> for CanonicalDate {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("not a YYYY-MM-DD date: '{}'", s))
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive range of days, `from <= to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: CanonicalDate,
    pub to: CanonicalDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed
    pub fn new(a: CanonicalDate, b: CanonicalDate) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    pub fn single(date: CanonicalDate) -> Self {
        Self { from: date.clone(), to: date }
    }

    pub fn contains(&self, date: &CanonicalDate) -> bool {
        *date >= self.from && *date <= self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{} .. {}", self.from, self.to)
        }
    }
}

/// One line of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: CanonicalDate,
    pub project: String,
    pub minutes: u32,
    pub comment: String,
}

/// Accumulated minutes per project
pub type Totals = BTreeMap<String, u64>;

/// Hourly rate per project
pub type RateTable = BTreeMap<String, f64>;

/// CLI output format
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}
