//! The append-only ledger file
//!
//! One row per line: `<date>  <project>  <minutes>  <comment>`. Readers split on
//! any run of whitespace; only the writer pads columns.

use crate::error::{Result, TrackError};
use crate::types::{CanonicalDate, DateRange, LedgerRow};
use crate::utils::time::{minutes_between, Clock};
use tracing::{debug, warn};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

static ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+(\d+)(?:\s+(.*?))?\s*$").unwrap());

/// Rows of one extraction, keyed by date, in file order within each date
pub type RowsByDate = BTreeMap<CanonicalDate, Vec<LedgerRow>>;

#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row as a single line write
    pub fn append(&self, row: &LedgerRow) -> Result<()> {
        let line = format_row(row);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TrackError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| TrackError::io(&self.path, e))?;
        debug!("appended to {}: {}", self.path.display(), line.trim_end());
        Ok(())
    }

    /// Every well-formed row, in file order. A missing ledger has no rows.
    pub fn rows(&self) -> Result<Vec<LedgerRow>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(TrackError::io(&self.path, e)),
        };

        let mut rows = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(line) {
                Some(row) => rows.push(row),
                None => warn!("{}:{}: skipping malformed line", self.path.display(), idx + 1),
            }
        }
        Ok(rows)
    }

    /// Rows whose date lies in `range`, grouped by date
    pub fn extract(&self, range: &DateRange) -> Result<RowsByDate> {
        let mut grouped = RowsByDate::new();
        let mut scanned = 0usize;
        for row in self.rows()? {
            scanned += 1;
            if range.contains(&row.date) {
                grouped.entry(row.date.clone()).or_default().push(row);
            }
        }
        debug!(
            "scanned {} rows, {} days in {} have data",
            scanned,
            grouped.len(),
            range
        );
        Ok(grouped)
    }

    pub fn last_modified(&self) -> Result<Option<SystemTime>> {
        match fs::metadata(&self.path) {
            Ok(meta) => meta
                .modified()
                .map(Some)
                .map_err(|e| TrackError::io(&self.path, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TrackError::io(&self.path, e)),
        }
    }

    /// Minutes since the last write, `None` if the ledger does not exist
    pub fn freshness(&self, clock: &dyn Clock) -> Result<Option<i64>> {
        Ok(self
            .last_modified()?
            .map(|mtime| minutes_between(mtime, clock.now())))
    }

    /// Set the modification time to now without changing content
    pub fn touch(&self, clock: &dyn Clock) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TrackError::io(&self.path, e))?;
        file.set_modified(SystemTime::from(clock.now()))
            .map_err(|e| TrackError::io(&self.path, e))
    }
}

/// Fold a multi-line comment onto one line: every embedded line break becomes `".  "`.
/// Blank lines are kept, so `"a\n\nb"` folds to `"a.  .  b"`.
pub fn normalize_comment(comment: &str) -> String {
    comment.trim().lines().collect::<Vec<_>>().join(".  ")
}

pub fn format_row(row: &LedgerRow) -> String {
    let line = format!(
        "{}  {:<10}  {:>3}  {}",
        row.date,
        row.project,
        row.minutes,
        normalize_comment(&row.comment)
    );
    format!("{}\n", line.trim_end())
}

pub fn parse_row(line: &str) -> Option<LedgerRow> {
    let caps = ROW.captures(line)?;
    Some(LedgerRow {
        date: CanonicalDate::parse(&caps[1])?,
        project: caps[2].to_string(),
        minutes: caps[3].parse().ok()?,
        comment: caps.get(4).map(|c| c.as_str().to_string()).unwrap_or_default(),
    })
}
