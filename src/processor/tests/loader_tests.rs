//! Tests for CSV input loading

use super::{SAMPLES_CSV, WATERSHED_CSV};
use crate::Error;
use crate::config::EmcConfig;
use crate::processor::{EmcPipeline, load_inputs, read_csv_table};
use polars::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_read_csv_table_keeps_every_column_as_string() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("samples.csv");
    fs::write(&path, SAMPLES_CSV).unwrap();

    let df = read_csv_table(&path, 0).unwrap();

    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 11);
    assert!(df.dtypes().iter().all(|dtype| *dtype == DataType::String));
}

#[test]
fn test_watershed_title_row_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("watershed.csv");
    fs::write(&path, WATERSHED_CSV).unwrap();

    let df = read_csv_table(&path, 1).unwrap();

    assert_eq!(df.height(), 2);
    assert!(df.column("Station Code").is_ok());
    assert!(df.column("Area").is_ok());
}

#[test]
fn test_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = read_csv_table(&temp_dir.path().join("absent.csv"), 0).unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));
}

#[test]
fn test_loaded_inputs_run_through_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let watershed = temp_dir.path().join("watershed.csv");
    let samples = temp_dir.path().join("samples.csv");
    fs::write(&watershed, WATERSHED_CSV).unwrap();
    fs::write(&samples, SAMPLES_CSV).unwrap();

    let config = EmcConfig::default();
    let inputs = load_inputs(&config, &watershed, &samples).unwrap();
    let output = EmcPipeline::new(config)
        .run(&inputs.watershed, &inputs.samples)
        .unwrap();

    assert_eq!(output.report.watershed_sites, 2);
    assert_eq!(output.report.sites, vec!["ABC", "XYZ"]);
    assert_eq!(output.report.unmatched_sites, vec!["XYZ"]);
}
