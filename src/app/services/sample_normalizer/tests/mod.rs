//! Tests for sample normalisation
//!
//! Shared fixtures build small raw tables in the layout of the field
//! sampling spreadsheets: identifying columns, two descriptor columns and a
//! handful of constituent columns including a dissolved fraction.


use crate::app::models::WatershedRecord;
use crate::app::services::watershed_normalizer::WatershedTable;
use polars::prelude::*;

/// Raw sample table with three rows across two sites and two storms
pub fn raw_sample_frame() -> DataFrame {
    df!(
        "SITE" => ["ABC1", "ABC1", "XYZ"],
        "DATE" => ["1/15/2019", "1/15/2019", "2/1/2019"],
        "TIME" => ["10:00", "10:30", "08:15"],
        "TYPE" => ["wet", "wet", "dry"],
        "SEASON" => ["Winter", "Winter", "Winter"],
        "FLOWCMS" => ["0.05", "0.10", "0.02"],
        "SIZE" => ["small", "small", "large"],
        "GEO" => ["north", "north", "south"],
        "TSS" => ["10", "20", "5"],
        "Cu" => ["3.5", "<1", "2.0"],
        "DFCu" => ["1.0", "1.2", "0.8"]
    )
    .unwrap()
}

/// Watershed lookup holding only site ABC
pub fn watershed_with_abc() -> WatershedTable {
    WatershedTable::from_records([WatershedRecord {
        site_code: "ABC".to_string(),
        area_km2: 2.0,
    }])
}
