//! Result table writing
//!
//! Converts each [`EmcTable`] into a polars DataFrame holding the level's
//! active key columns followed by the result columns, then writes it as CSV
//! or Snappy-compressed Parquet. The area key dimension is carried by the
//! `area_km2` result column rather than a key column of its own.

use crate::app::models::{Dimension, EmcResult, EmcTable};
use crate::config::TableFormat;
use crate::{Error, Result};
use polars::prelude::{
    Column, CsvWriter, DataFrame, NamedFrom, ParquetCompression, ParquetWriter, SerWriter, Series,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result columns written after the key columns, in order
pub const RESULT_COLUMNS: [&str; 8] = [
    "samples",
    "area_km2",
    "mass_emitted_g",
    "liters_total",
    "days_elapsed",
    "emc_g_per_l",
    "massload_kg_per_day",
    "fluxrate_kg_per_yr_per_km2",
];

fn key_column(table: &EmcTable, dimension: Dimension) -> Column {
    let name = dimension.column_name().into();
    let rows = &table.rows;

    let series = match dimension {
        Dimension::Year => Series::new(
            name,
            rows.iter().map(|row| row.key.year).collect::<Vec<_>>(),
        ),
        Dimension::Area => Series::new(
            name,
            rows.iter()
                .map(|row| row.key.area_km2.map(|area| area.0))
                .collect::<Vec<_>>(),
        ),
        _ => Series::new(
            name,
            rows.iter()
                .map(|row| row.key.value_of(dimension))
                .collect::<Vec<_>>(),
        ),
    };

    series.into()
}

fn metric_column(table: &EmcTable, name: &str, value: impl Fn(&EmcResult) -> Option<f64>) -> Column {
    Series::new(name.into(), table.rows.iter().map(value).collect::<Vec<_>>()).into()
}

/// Build the output DataFrame of a result table
pub fn to_dataframe(table: &EmcTable) -> Result<DataFrame> {
    let mut columns: Vec<Column> = table
        .level
        .dimensions()
        .iter()
        .filter(|dimension| **dimension != Dimension::Area)
        .map(|dimension| key_column(table, *dimension))
        .collect();

    let samples: Vec<u64> = table.rows.iter().map(|row| row.samples as u64).collect();
    columns.push(Series::new(RESULT_COLUMNS[0].into(), samples).into());
    columns.push(metric_column(table, RESULT_COLUMNS[1], |row| row.area_km2));
    columns.push(metric_column(table, RESULT_COLUMNS[2], |row| row.mass_emitted_g));
    columns.push(metric_column(table, RESULT_COLUMNS[3], |row| row.liters_total));
    columns.push(metric_column(table, RESULT_COLUMNS[4], |row| row.days_elapsed));
    columns.push(metric_column(table, RESULT_COLUMNS[5], |row| row.emc_g_per_l));
    columns.push(metric_column(table, RESULT_COLUMNS[6], |row| {
        row.massload_kg_per_day
    }));
    columns.push(metric_column(table, RESULT_COLUMNS[7], |row| {
        row.fluxrate_kg_per_yr_per_km2
    }));

    Ok(DataFrame::new(columns)?)
}

/// Output path of `table` under `directory`
pub fn output_path(directory: &Path, table: &EmcTable, format: TableFormat) -> PathBuf {
    directory.join(format!("{}.{}", table.level.file_stem(), format.extension()))
}

/// Write one result table, returning the file written
pub fn write_table(table: &EmcTable, directory: &Path, format: TableFormat) -> Result<PathBuf> {
    std::fs::create_dir_all(directory).map_err(|e| {
        Error::io(
            format!("Failed to create output directory {}", directory.display()),
            e,
        )
    })?;

    let path = output_path(directory, table, format);
    let mut df = to_dataframe(table)?;
    let mut file = File::create(&path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;

    match format {
        TableFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
        }
        TableFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)?;
        }
    }

    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(path)
}

/// Write every table, returning the files written in table order
pub fn write_tables(
    tables: &[EmcTable],
    directory: &Path,
    format: TableFormat,
) -> Result<Vec<PathBuf>> {
    let paths = tables
        .iter()
        .map(|table| write_table(table, directory, format))
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Wrote {} result tables to {}",
        paths.len(),
        directory.display()
    );
    Ok(paths)
}
