//! Clock access for freshness and "today" computations

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The operating system clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Whole minutes from `then` to `now`, rounded to the nearest minute and never negative
pub fn minutes_between(then: SystemTime, now: DateTime<Utc>) -> i64 {
    let then = DateTime::<Utc>::from(then);
    let seconds = (now - then).num_seconds().max(0);
    (seconds + 30) / 60
}
