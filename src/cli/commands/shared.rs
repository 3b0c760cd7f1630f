//! Shared components for CLI commands
//!
//! Logging setup, progress bars and the human-readable report sections used
//! by both the run and validate commands.

use crate::app::models::Unit;
use crate::cli::args::InputArgs;
use crate::processor::PipelineReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Most issues listed individually in a human report
const MAX_LISTED_ISSUES: usize = 10;

/// Outcome of a command, returned to `main`
#[derive(Debug, Clone, Default)]
pub struct CommandSummary {
    /// Long-format records processed
    pub records: usize,
    /// Result files written
    pub files_written: Vec<PathBuf>,
    /// Non-fatal data issues recorded
    pub issues: usize,
    pub elapsed: Duration,
}

/// Set up structured logging for a command
///
/// `RUST_LOG` takes precedence over the verbosity flags. Initialising twice
/// (as tests do) keeps the first subscriber.
pub fn setup_logging(args: &InputArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("emc_processor={}", log_level)));

    let initialised = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if initialised.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Progress bar over site-storm groups, hidden when progress is off
pub fn create_progress_bar(show_progress: bool) -> Option<ProgressBar> {
    if !show_progress {
        return None;
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} groups")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    Some(pb)
}

/// Print the input coverage section of a report
pub fn print_input_summary(report: &PipelineReport) {
    println!("{}", "Inputs:".bright_cyan().bold());
    println!(
        "   • Watershed: {} sites from {} rows ({} dropped)",
        report.watershed_sites, report.watershed_rows_in, report.watershed_rows_dropped
    );
    println!(
        "   • Samples: {} rows ({} dropped) → {} records",
        report.sample_rows_in, report.sample_rows_dropped, report.records
    );
    println!(
        "   • Sites: {} ({:.0}% with watershed area)",
        report.sites.len(),
        report.join_coverage() * 100.0
    );
    if !report.unmatched_sites.is_empty() {
        println!(
            "   • {} {}",
            "No area:".yellow(),
            report.unmatched_sites.join(", ")
        );
    }
    if report.unordered_records > 0 {
        println!(
            "   • {} {}",
            "Records without timestamp:".yellow(),
            report.unordered_records
        );
    }
}

/// Print the constituent and unit section of a report
pub fn print_unit_summary(report: &PipelineReport) {
    println!("{}", "Constituents:".bright_cyan().bold());
    for unit in [Unit::MgPerL, Unit::UgPerL] {
        let names = report.constituents_by_unit(unit);
        if !names.is_empty() {
            println!("   • {}: {}", unit, names.join(", "));
        }
    }
    if !report.dissolved_constituents.is_empty() {
        println!(
            "   • Excluded dissolved fractions: {}",
            report.dissolved_constituents.join(", ")
        );
    }
}

/// Print issue counts by category and the first few issues
pub fn print_issue_summary(report: &PipelineReport) {
    if !report.has_issues() {
        println!("{}", "No data issues found".bright_green());
        return;
    }

    println!(
        "{} {}",
        "Data issues:".bright_yellow().bold(),
        report.issues.len()
    );
    for (category, count) in report.issue_counts() {
        println!("   • {}: {}", category, count);
    }

    for issue in report.issues.iter().take(MAX_LISTED_ISSUES) {
        println!("     - {}", issue.to_string().dimmed());
    }
    if report.issues.len() > MAX_LISTED_ISSUES {
        println!(
            "     ... and {} more (use --report json for the full list)",
            report.issues.len() - MAX_LISTED_ISSUES
        );
    }
}
