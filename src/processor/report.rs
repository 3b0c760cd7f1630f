//! Run report: input coverage, unit assignment and data issues
//!
//! Serialises to JSON for `--report json`; the CLI renders the human form.

use crate::app::models::{AnalysisLevel, DataIssue, Unit};
use serde::Serialize;
use std::collections::BTreeMap;

/// Row count of one produced table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub level: AnalysisLevel,
    pub rows: usize,

    /// Rows whose group had no usable samples
    pub empty_groups: usize,
}

/// Diagnostics collected over one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub watershed_rows_in: usize,
    pub watershed_rows_dropped: usize,

    /// Distinct codes in the normalised watershed table
    pub watershed_sites: usize,

    pub sample_rows_in: usize,
    pub sample_rows_dropped: usize,

    /// Long-format records after reshaping
    pub records: usize,

    /// Records without a parseable timestamp
    pub unordered_records: usize,

    pub sites: Vec<String>,

    /// Sample sites with no watershed area
    pub unmatched_sites: Vec<String>,

    pub constituents: Vec<String>,
    pub dissolved_constituents: Vec<String>,
    pub units: BTreeMap<String, Unit>,

    /// Groups at the finest level
    pub groups: usize,

    pub tables: Vec<TableSummary>,
    pub issues: Vec<DataIssue>,
}

impl PipelineReport {
    /// Number of issues in each category
    pub fn issue_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.category()).or_insert(0) += 1;
        }
        counts
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Share of sample sites that found a watershed area, 0.0 to 1.0
    pub fn join_coverage(&self) -> f64 {
        if self.sites.is_empty() {
            return 1.0;
        }
        let matched = self.sites.len() - self.unmatched_sites.len();
        matched as f64 / self.sites.len() as f64
    }

    /// Constituents assigned each unit
    pub fn constituents_by_unit(&self, unit: Unit) -> Vec<&str> {
        self.units
            .iter()
            .filter(|(_, assigned)| **assigned == unit)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Serialise the report as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_counts_by_category() {
        let report = PipelineReport {
            issues: vec![
                DataIssue::JoinMiss {
                    site: "XYZ".to_string(),
                },
                DataIssue::JoinMiss {
                    site: "NOP".to_string(),
                },
                DataIssue::ValueParse {
                    constituent: "Cu".to_string(),
                    count: 4,
                },
            ],
            ..Default::default()
        };

        let counts = report.issue_counts();
        assert_eq!(counts["join_miss"], 2);
        assert_eq!(counts["value_parse"], 1);
        assert!(report.has_issues());
    }

    #[test]
    fn test_join_coverage() {
        let report = PipelineReport {
            sites: vec!["ABC".into(), "DEF".into(), "XYZ".into(), "NOP".into()],
            unmatched_sites: vec!["XYZ".into()],
            ..Default::default()
        };
        assert_eq!(report.join_coverage(), 0.75);
        assert_eq!(PipelineReport::default().join_coverage(), 1.0);
    }

    #[test]
    fn test_json_report_tags_issue_kinds() {
        let mut units = BTreeMap::new();
        units.insert("TSS".to_string(), Unit::MgPerL);
        let report = PipelineReport {
            units,
            issues: vec![DataIssue::JoinMiss {
                site: "XYZ".to_string(),
            }],
            ..Default::default()
        };

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["units"]["TSS"], "mg/L");
        assert_eq!(value["issues"][0]["kind"], "join_miss");
        assert_eq!(value["issues"][0]["site"], "XYZ");
    }
}
