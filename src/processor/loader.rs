//! CSV input loading
//!
//! Tables are read with schema inference disabled, so every column arrives as
//! a string and numeric parsing stays with the normalisers, where failures
//! become recorded issues instead of read errors.

use crate::config::EmcConfig;
use crate::{Error, Result};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use std::path::Path;
use tracing::debug;

/// Read a CSV file into an all-string DataFrame
///
/// `skip_rows` lines are skipped before the header row.
pub fn read_csv_table(path: &Path, skip_rows: usize) -> Result<DataFrame> {
    if !path.exists() {
        return Err(Error::input_not_found(path));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(skip_rows)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Raw watershed and sample tables of one run
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub watershed: DataFrame,
    pub samples: DataFrame,
}

/// Load both input tables, applying the watershed header skip
pub fn load_inputs(config: &EmcConfig, watershed: &Path, samples: &Path) -> Result<RawInputs> {
    Ok(RawInputs {
        watershed: read_csv_table(watershed, config.watershed.skip_rows)?,
        samples: read_csv_table(samples, 0)?,
    })
}
