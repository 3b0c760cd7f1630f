//! EMC Processor Library
//!
//! A Rust library for computing stormwater event mean concentrations (EMC),
//! mass loadings and area-normalised flux rates from water-quality sampling
//! and watershed drainage-area tables.
//!
//! This library provides tools for:
//! - Normalising watershed reference tables into a site code → area lookup
//! - Reshaping wide sample tables into long-format, unit-tagged records
//! - Grouping records by site, storm, season, year, type and constituent
//! - Integrating mass and volume per group with guarded divisions
//! - Rolling results up to coarser levels by ratio of sums
//! - Writing result tables as CSV or Parquet

pub mod config;
pub mod constants;
pub mod error;
pub mod processor;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod emc_calculator;
        pub mod field_parsers;
        pub mod grouper;
        pub mod rollup;
        pub mod sample_normalizer;
        pub mod watershed_normalizer;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{AnalysisLevel, DataIssue, EmcResult, EmcTable, SampleRecord};
pub use config::EmcConfig;
pub use error::{Error, Result};
pub use processor::{EmcPipeline, PipelineOutput, PipelineReport};
