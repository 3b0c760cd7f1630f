//! Validate command: normalise the inputs and report, writing nothing

use super::shared::{
    CommandSummary, print_input_summary, print_issue_summary, print_unit_summary, setup_logging,
};
use crate::cli::args::{ReportFormat, ValidateArgs};
use crate::processor::{EmcPipeline, load_inputs};
use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;

/// Execute the validate command
pub fn run_validate(args: &ValidateArgs) -> Result<CommandSummary> {
    setup_logging(&args.input);
    let start_time = Instant::now();

    args.input.validate().context("Invalid input arguments")?;
    let config = args
        .input
        .load_config()
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let inputs = load_inputs(&config, &args.input.watershed, &args.input.samples)
        .context("Failed to load input tables")?;
    let normalized = EmcPipeline::new(config)
        .normalize(&inputs.watershed, &inputs.samples)
        .context("Input normalisation failed")?;
    let report = normalized.report();

    match args.input.report {
        ReportFormat::Human => {
            if !args.input.quiet {
                println!("\n{}", "EMC Input Validation".bright_green().bold());
                println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
                print_input_summary(&report);
                print_unit_summary(&report);
                print_issue_summary(&report);
                println!();
            }
        }
        ReportFormat::Json => {
            let json = report
                .to_json()
                .context("Failed to serialise validation report")?;
            println!("{}", json);
        }
    }

    Ok(CommandSummary {
        records: report.records,
        files_written: Vec::new(),
        issues: report.issues.len(),
        elapsed: start_time.elapsed(),
    })
}
