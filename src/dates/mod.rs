//! Calendar arithmetic, date specs and period resolution

pub mod calendar;
pub mod period;
pub mod spec;

pub use calendar::Calendar;
pub use period::{resolve, PeriodContext};
pub use spec::parse_date_spec;
