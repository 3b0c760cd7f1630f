//! Tests for watershed normalisation

pub mod normalizer_tests;

use polars::prelude::*;

/// Build a raw watershed table with the default column names
pub fn watershed_frame(rows: &[(Option<&str>, Option<&str>)]) -> DataFrame {
    let codes: Vec<Option<&str>> = rows.iter().map(|(code, _)| *code).collect();
    let areas: Vec<Option<&str>> = rows.iter().map(|(_, area)| *area).collect();
    df!(
        "Station Code" => codes,
        "Area" => areas,
        "Notes" => vec![Some("ignored"); rows.len()]
    )
    .unwrap()
}
