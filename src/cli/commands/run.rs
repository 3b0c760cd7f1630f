//! Run command: full pipeline with result tables written to disk

use super::shared::{
    CommandSummary, create_progress_bar, print_input_summary, print_issue_summary,
    print_unit_summary, setup_logging,
};
use crate::cli::args::{ReportFormat, RunArgs};
use crate::processor::{EmcPipeline, PipelineOutput, load_inputs};
use anyhow::{Context, Result};
use colored::*;
use indicatif::HumanDuration;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Execute the run command
pub fn run_pipeline(args: &RunArgs) -> Result<CommandSummary> {
    setup_logging(&args.input);
    let start_time = Instant::now();

    args.input.validate().context("Invalid input arguments")?;
    let config = args.build_config().context("Failed to load configuration")?;

    let inputs = load_inputs(&config, &args.input.watershed, &args.input.samples)
        .context("Failed to load input tables")?;

    let pipeline = EmcPipeline::new(config);
    let progress_bar = create_progress_bar(args.input.show_progress());
    let output = pipeline
        .run_with_progress(&inputs.watershed, &inputs.samples, progress_bar.as_ref())
        .context("EMC calculation failed")?;
    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }

    let files_written = pipeline
        .write(&output)
        .context("Failed to write result tables")?;
    let elapsed = start_time.elapsed();
    info!("Run finished in {:.2?}", elapsed);

    match args.input.report {
        ReportFormat::Human => {
            if !args.input.quiet {
                print_human_report(&output, &files_written, elapsed);
            }
        }
        ReportFormat::Json => {
            let json = output
                .report
                .to_json()
                .context("Failed to serialise run report")?;
            println!("{}", json);
        }
    }

    Ok(CommandSummary {
        records: output.report.records,
        files_written,
        issues: output.report.issues.len(),
        elapsed,
    })
}

fn print_human_report(output: &PipelineOutput, files: &[PathBuf], elapsed: Duration) {
    let report = &output.report;

    println!("\n{}", "EMC Processing Complete".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    print_input_summary(report);
    print_unit_summary(report);

    println!("{}", "Results:".bright_cyan().bold());
    println!("   • Site-storm groups: {}", report.groups);
    for table in &report.tables {
        let empty = if table.empty_groups > 0 {
            format!(" ({} without usable samples)", table.empty_groups)
        } else {
            String::new()
        };
        println!("   • {}: {} rows{}", table.level, table.rows, empty);
    }
    println!("   • Processing time: {}", HumanDuration(elapsed));

    print_issue_summary(report);

    if !files.is_empty() {
        println!("{}", "Output Files:".bright_cyan().bold());
        for path in files {
            println!("   • {}", path.display());
        }
    }
    println!();
}
