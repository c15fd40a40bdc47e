//! Human-friendly duration parsing for recorded entries.
//!
//! Supports `45` (minutes), `1h30m`, `30m1h`, `1.5h`, `20m`, and `s` for
//! "since the ledger was last written".

use crate::error::{Result, TrackError};
use once_cell::sync::Lazy;
use regex_lite::Regex;

static HOURS_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+(?:\.\d+)?)h)?(?:(\d+)m)?$").unwrap());
static MINUTES_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+)m)?(?:(\d+(?:\.\d+)?)h)?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSpec {
    Minutes(u32),
    /// Minutes elapsed since the ledger's last modification
    SinceLastWrite,
}

pub fn parse_duration_spec(token: &str) -> Result<DurationSpec> {
    let token = token.trim();
    let invalid = || TrackError::InvalidDuration(token.to_string());

    if token.is_empty() {
        return Ok(DurationSpec::Minutes(0));
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().map(DurationSpec::Minutes).map_err(|_| invalid());
    }
    if token == "s" {
        return Ok(DurationSpec::SinceLastWrite);
    }

    let (hours, minutes) = if let Some(caps) = HOURS_FIRST.captures(token) {
        (caps.get(1), caps.get(2))
    } else if let Some(caps) = MINUTES_FIRST.captures(token) {
        (caps.get(2), caps.get(1))
    } else {
        return Err(invalid());
    };

    let hours: f64 = match hours {
        Some(h) => h.as_str().parse().map_err(|_| invalid())?,
        None => 0.0,
    };
    let minutes: f64 = match minutes {
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 0.0,
    };
    let total = (hours * 60.0).round() + minutes;
    if total > u32::MAX as f64 {
        return Err(invalid());
    }
    Ok(DurationSpec::Minutes(total as u32))
}
