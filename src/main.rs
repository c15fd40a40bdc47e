//! timetrack - append-only time ledger with day, week, month and year summaries

mod aggregate;
mod config;
mod dates;
mod duration;
mod error;
mod ledger;
mod logging;
mod tracker;
mod types;
mod utils;

use clap::{Parser, Subcommand};
use colored::Colorize;
use crate::config::Config;
use tracing::debug;
use std::path::PathBuf;
use std::process::{self, Command};
use tracker::{ReportOptions, Tracker};
use types::OutputFormat;
use utils::format::{format_csv, format_json, format_minutes, format_table};

#[derive(Parser)]
#[command(name = "timetrack")]
#[command(author, version, about = "Record time spent per project and summarize it by day, week, month or year")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Ledger file (overrides config and TIMETRACK_FILE)
    #[arg(short = 'f', long, global = true)]
    file: Option<PathBuf>,

    /// Config file (default: <config dir>/timetrack/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format for reports
    #[arg(short = 'o', long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record time spent on a project
    Add {
        /// Date of the entry: 2d, 1w, 2024-07-04, 7/4/2024, "Jul 4 2024" (default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Project name (no whitespace)
        project: String,
        /// Time spent: 45, 1h30m, 30m1h, 1.5h, or s for "since last write"
        duration: String,
        /// Free-form comment; words may start with '-'
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        comment: Vec<String>,
    },
    /// Summarize recorded time
    Report {
        /// day, week, month, mtd, year, ytd, or a range A[:B]
        #[arg(default_value = "day")]
        period: String,
        /// Date the period is anchored on (default: today)
        #[arg(short, long)]
        reference: Option<String>,
        /// List every day of the period
        #[arg(long)]
        full: bool,
        /// Leave out zero-minute entries
        #[arg(long)]
        billable_only: bool,
    },
    /// Print minutes since the ledger was last written
    Fresh,
    /// Reset the last-write time without recording anything
    Kill,
    /// Open the ledger in $VISUAL or $EDITOR
    Edit,
    /// Print the ledger path
    Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(ref file) = cli.file {
        config.ledger = file.clone();
    }
    debug!("config: {:?}", config);

    let tracker = Tracker::new(config);

    let result = match cli.command {
        Some(Commands::Add {
            date,
            project,
            duration,
            comment,
        }) => run_add(&tracker, date.as_deref(), &project, &duration, &comment, cli.verbose),
        Some(Commands::Report {
            period,
            reference,
            full,
            billable_only,
        }) => {
            let options = ReportOptions { full, billable_only };
            run_report(&tracker, &period, reference.as_deref(), options, cli.format)
        }
        None => run_report(&tracker, "day", None, ReportOptions::default(), cli.format),
        Some(Commands::Fresh) => run_fresh(&tracker),
        Some(Commands::Kill) => tracker.reset_freshness().map_err(Into::into),
        Some(Commands::Edit) => run_edit(&tracker),
        Some(Commands::Path) => {
            println!("{}", tracker.ledger().path().display());
            Ok(())
        }
    };

    if let Err(ref e) = result {
        if let Some(track) = e.downcast_ref::<error::TrackError>() {
            if track.is_parse() {
                eprintln!("{}", "See `timetrack --help` for accepted formats.".dimmed());
            }
        }
    }
    result
}

fn run_add(
    tracker: &Tracker,
    date: Option<&str>,
    project: &str,
    duration: &str,
    comment: &[String],
    verbose: bool,
) -> anyhow::Result<()> {
    let row = tracker.record(date, project, duration, comment)?;
    if verbose {
        println!(
            "{} {} {} {}",
            "✓".green(),
            row.date,
            row.project.bold(),
            format_minutes(u64::from(row.minutes))
        );
    }
    Ok(())
}

fn run_report(
    tracker: &Tracker,
    period: &str,
    reference: Option<&str>,
    options: ReportOptions,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = tracker.report(period, reference, options)?;
    let output = match format {
        OutputFormat::Table => format_table(&report, &tracker.config().rates),
        OutputFormat::Json => format_json(&report),
        OutputFormat::Csv => format_csv(&report),
    };
    println!("{}", output);
    Ok(())
}

fn run_fresh(tracker: &Tracker) -> anyhow::Result<()> {
    match tracker.freshness()? {
        Some(minutes) => {
            println!("{}", minutes);
            Ok(())
        }
        // Prompt integrations print nothing when there is no ledger yet
        None => process::exit(1),
    }
}

fn run_edit(tracker: &Tracker) -> anyhow::Result<()> {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());
    let path = tracker.ledger().path();
    let status = Command::new(&editor).arg(path).status()?;
    if !status.success() {
        anyhow::bail!("{} exited with {}", editor, status);
    }
    Ok(())
}
