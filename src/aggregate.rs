//! Folding ledger rows into per-project totals and billed amounts

use crate::ledger::RowsByDate;
use crate::types::{CanonicalDate, DateRange, LedgerRow, RateTable, Totals};
use serde::Serialize;
use std::collections::BTreeMap;

/// Minutes per project. Zero-minute rows count as present only with `include_zero`.
pub fn sum_totals<'a, I>(rows: I, include_zero: bool) -> Totals
where
    I: IntoIterator<Item = &'a LedgerRow>,
{
    let mut totals = Totals::new();
    for row in rows {
        if row.minutes == 0 && !include_zero {
            continue;
        }
        *totals.entry(row.project.clone()).or_insert(0) += u64::from(row.minutes);
    }
    totals
}

/// Billed amounts for one set of totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Billing {
    /// Amount per project, `None` when the project has no rate
    pub projects: BTreeMap<String, Option<f64>>,
    pub total_minutes: u64,
    pub total_billed: f64,
}

pub fn billed(totals: &Totals, rates: &RateTable) -> Billing {
    let mut billing = Billing::default();
    for (project, &minutes) in totals {
        let amount = rates.get(project).map(|rate| minutes as f64 / 60.0 * rate);
        if let Some(amount) = amount {
            billing.total_billed += amount;
        }
        billing.total_minutes += minutes;
        billing.projects.insert(project.clone(), amount);
    }
    billing
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: CanonicalDate,
    /// `None` when the day has no data
    pub totals: Option<Totals>,
}

/// Everything the summary command prints
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub range: DateRange,
    /// One entry per calendar day of the range, only for full reports
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<DaySummary>,
    pub days_with_data: usize,
    pub totals: Totals,
    pub billing: Billing,
}

/// Build a report over `days`, the expanded `range`
pub fn build_report(
    range: DateRange,
    days: &[CanonicalDate],
    rows: &RowsByDate,
    rates: &RateTable,
    include_zero: bool,
    full: bool,
) -> Report {
    let mut summaries = Vec::new();
    let mut days_with_data = 0;
    for date in days {
        let totals = rows
            .get(date)
            .map(|day_rows| sum_totals(day_rows, include_zero))
            .filter(|totals| !totals.is_empty());
        if totals.is_some() {
            days_with_data += 1;
        }
        if full {
            summaries.push(DaySummary {
                date: date.clone(),
                totals,
            });
        }
    }

    let totals = sum_totals(
        days.iter().filter_map(|date| rows.get(date)).flatten(),
        include_zero,
    );
    let billing = billed(&totals, rates);
    Report {
        range,
        days: summaries,
        days_with_data,
        totals,
        billing,
    }
}
