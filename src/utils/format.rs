//! Output formatting utilities

use crate::aggregate::Report;
use crate::types::RateTable;
use colored::Colorize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Format minutes as `H:MM`
pub fn format_minutes(minutes: u64) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Format a billed amount, `-` when not billable
pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(amount) => format!("{:.2}", amount),
        None => "-".to_string(),
    }
}

/// Table row for display
#[derive(Tabled)]
pub struct TotalsRow {
    #[tabled(rename = "Project")]
    pub project: String,
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Minutes")]
    pub minutes: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Billed")]
    pub billed: String,
}

#[derive(Tabled)]
pub struct DayRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Project")]
    pub project: String,
    #[tabled(rename = "Time")]
    pub time: String,
}

/// Format a report as tables; `rates` supplies the Rate column
pub fn format_table(report: &Report, rates: &RateTable) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} {}\n", "Period:".bold(), report.range.to_string().cyan()));

    if !report.days.is_empty() {
        let mut rows = Vec::new();
        for day in &report.days {
            match &day.totals {
                Some(totals) => {
                    for (project, &minutes) in totals {
                        rows.push(DayRow {
                            date: day.date.to_string(),
                            project: project.clone(),
                            time: format_minutes(minutes),
                        });
                    }
                }
                None => rows.push(DayRow {
                    date: day.date.to_string(),
                    project: "no data".dimmed().to_string(),
                    time: "-".to_string(),
                }),
            }
        }
        let table = Table::new(rows).with(Style::rounded()).to_string();
        output.push_str(&table);
        output.push('\n');
    }

    if report.totals.is_empty() {
        output.push_str(&format!("{}\n", "No entries in this period.".yellow()));
        return output;
    }

    let mut rows: Vec<TotalsRow> = report
        .totals
        .iter()
        .map(|(project, &minutes)| TotalsRow {
            project: project.clone(),
            time: format_minutes(minutes),
            minutes: minutes.to_string(),
            rate: rates
                .get(project)
                .map(|r| format!("{:.2}", r))
                .unwrap_or_else(|| "-".to_string()),
            billed: format_amount(report.billing.projects.get(project).copied().flatten()),
        })
        .collect();
    rows.push(TotalsRow {
        project: "Total".bold().to_string(),
        time: format_minutes(report.billing.total_minutes).bold().to_string(),
        minutes: report.billing.total_minutes.to_string(),
        rate: String::new(),
        billed: format!("{:.2}", report.billing.total_billed).bold().to_string(),
    });

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    output.push_str(&table);
    output
}

/// Format a report as JSON
pub fn format_json(report: &Report) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Format report totals as CSV
pub fn format_csv(report: &Report) -> String {
    let mut output = String::from("From,To,Project,Minutes,Billed\n");
    for (project, minutes) in &report.totals {
        let billed = report
            .billing
            .projects
            .get(project)
            .copied()
            .flatten()
            .map(|b| format!("{:.2}", b))
            .unwrap_or_default();
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            report.range.from, report.range.to, project, minutes, billed
        ));
    }
    output
}
