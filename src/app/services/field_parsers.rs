//! Field parsing utilities for raw input tables
//!
//! Raw tables arrive as polars DataFrames of arbitrary column types. These
//! helpers pull a column out as optional strings and parse individual cells,
//! turning anything unparseable into `None` rather than an error.

use crate::{Error, Result};
use polars::prelude::*;

/// Extract a column as trimmed optional strings
///
/// Any column type is accepted; non-string columns are cast first. Empty
/// cells become `None`.
pub fn string_column(df: &DataFrame, table: &str, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| Error::missing_column(table, name))?;
    let column = column.cast(&DataType::String)?;

    Ok(column
        .str()?
        .into_iter()
        .map(|cell| {
            cell.map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
        .collect())
}

/// Names of all columns in `df`, in table order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Parse a numeric cell; non-numeric or non-finite text yields `None`
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse an optional numeric cell, reporting whether a present cell failed
///
/// Returns the parsed value and `true` when text was present but not numeric.
pub fn parse_optional_numeric(raw: Option<&str>) -> (Option<f64>, bool) {
    match raw {
        None => (None, false),
        Some(text) => {
            let parsed = parse_numeric(text);
            (parsed, parsed.is_none())
        }
    }
}
