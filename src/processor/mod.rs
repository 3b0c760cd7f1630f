//! EMC pipeline orchestration
//!
//! Runs the processing stages as a chain of pure functions, each taking the
//! previous stage's value and returning a new one:
//!
//! 1. watershed table → [`WatershedTable`](crate::app::services::watershed_normalizer::WatershedTable)
//! 2. sample table → long-format records joined with area
//! 3. records → site-storm groups
//! 4. groups → site-storm [`EmcTable`]
//! 5. site-storm table → each configured roll-up level
//!
//! Loading and writing live in [`loader`] and [`writer`] so the pipeline
//! itself only ever sees DataFrames and result tables.

pub mod loader;
pub mod report;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use loader::{RawInputs, load_inputs, read_csv_table};
pub use report::{PipelineReport, TableSummary};
pub use writer::{to_dataframe, write_table, write_tables};

use crate::Result;
use crate::app::models::{AnalysisLevel, DataIssue, EmcTable};
use crate::app::services::emc_calculator::calculate_group_results;
use crate::app::services::grouper::group_records;
use crate::app::services::rollup::rollup;
use crate::app::services::sample_normalizer::{NormalizedSamples, normalize_samples};
use crate::app::services::watershed_normalizer::{NormalizedWatershed, normalize_watershed};
use crate::config::EmcConfig;
use indicatif::ProgressBar;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Both input tables after normalisation
#[derive(Debug, Clone)]
pub struct NormalizedInputs {
    pub watershed: NormalizedWatershed,
    pub samples: NormalizedSamples,
}

impl NormalizedInputs {
    /// Report covering the normalisation stages only
    pub fn report(&self) -> PipelineReport {
        let unmatched_sites = self
            .samples
            .sites
            .iter()
            .filter(|site| !self.watershed.table.contains(site))
            .cloned()
            .collect();

        let mut issues = self.watershed.issues.clone();
        issues.extend(self.samples.issues.iter().cloned());

        PipelineReport {
            watershed_rows_in: self.watershed.rows_in,
            watershed_rows_dropped: self.watershed.rows_dropped,
            watershed_sites: self.watershed.table.len(),
            sample_rows_in: self.samples.rows_in,
            sample_rows_dropped: self.samples.rows_dropped,
            records: self.samples.records.len(),
            unordered_records: self.samples.unordered_records(),
            sites: self.samples.sites.iter().cloned().collect(),
            unmatched_sites,
            constituents: self.samples.constituents.clone(),
            dissolved_constituents: self.samples.dissolved_constituents.clone(),
            units: self.samples.units.clone(),
            issues,
            ..Default::default()
        }
    }
}

/// Result tables of a run, in configured level order, with the run report
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub tables: Vec<EmcTable>,
    pub report: PipelineReport,
}

impl PipelineOutput {
    pub fn table(&self, level: AnalysisLevel) -> Option<&EmcTable> {
        self.tables.iter().find(|table| table.level == level)
    }
}

/// EMC pipeline driven by an [`EmcConfig`]
#[derive(Debug, Clone, Default)]
pub struct EmcPipeline {
    config: EmcConfig,
}

impl EmcPipeline {
    pub fn new(config: EmcConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmcConfig {
        &self.config
    }

    /// Normalise both raw tables without computing any results
    pub fn normalize(&self, watershed: &DataFrame, samples: &DataFrame) -> Result<NormalizedInputs> {
        let watershed = normalize_watershed(watershed, &self.config.watershed)?;
        info!(
            "Watershed table: {} sites from {} rows",
            watershed.table.len(),
            watershed.rows_in
        );

        let samples = normalize_samples(samples, &watershed.table, &self.config.samples)?;
        info!(
            "Sample table: {} records across {} sites and {} constituents",
            samples.records.len(),
            samples.sites.len(),
            samples.constituents.len()
        );

        Ok(NormalizedInputs { watershed, samples })
    }

    /// Run the full pipeline over two raw tables
    pub fn run(&self, watershed: &DataFrame, samples: &DataFrame) -> Result<PipelineOutput> {
        self.run_with_progress(watershed, samples, None)
    }

    /// Run the full pipeline, advancing `progress_bar` once per site-storm group
    pub fn run_with_progress(
        &self,
        watershed: &DataFrame,
        samples: &DataFrame,
        progress_bar: Option<&ProgressBar>,
    ) -> Result<PipelineOutput> {
        self.config.validate()?;

        let inputs = self.normalize(watershed, samples)?;
        let mut report = inputs.report();

        let groups = group_records(inputs.samples.records, AnalysisLevel::SiteStorm);
        report.groups = groups.len();
        if let Some(pb) = progress_bar {
            pb.set_length(groups.len() as u64);
        }

        let site_storm = calculate_group_results(&groups, AnalysisLevel::SiteStorm, progress_bar);

        let tables: Vec<EmcTable> = self
            .config
            .output
            .levels
            .iter()
            .map(|level| {
                if level.is_rollup() {
                    rollup(&site_storm, *level)
                } else {
                    site_storm.clone()
                }
            })
            .collect();

        for table in &tables {
            let guards = division_guards(table);
            if !guards.is_empty() {
                debug!("{}: {} undefined metrics", table.level, guards.len());
            }
            report.issues.extend(guards);
            report.tables.push(TableSummary {
                level: table.level,
                rows: table.len(),
                empty_groups: table.rows.iter().filter(|row| row.samples == 0).count(),
            });
        }

        if !report.unmatched_sites.is_empty() {
            warn!(
                "{} of {} sites have no watershed area",
                report.unmatched_sites.len(),
                report.sites.len()
            );
        }
        info!(
            "Computed {} site-storm groups into {} tables",
            report.groups,
            tables.len()
        );

        Ok(PipelineOutput { tables, report })
    }

    /// Write every table of `output` to the configured directory and format
    pub fn write(&self, output: &PipelineOutput) -> Result<Vec<PathBuf>> {
        write_tables(
            &output.tables,
            &self.config.output.directory,
            self.config.output.format,
        )
    }
}

/// One issue per metric left null in a group that had samples
pub fn division_guards(table: &EmcTable) -> Vec<DataIssue> {
    table
        .rows
        .iter()
        .flat_map(|row| {
            row.guarded_metrics()
                .into_iter()
                .map(move |metric| DataIssue::DivisionGuard {
                    level: table.level,
                    group: row.key.label(),
                    metric,
                })
        })
        .collect()
}
