//! Tests for the pipeline, loader and writer
//!
//! The fixtures describe two sites with a watershed area (ABC, two storms)
//! and one without (XYZ), each sampled twice per storm for TSS, copper and
//! dissolved copper.

pub mod loader_tests;

use polars::prelude::*;

/// Raw watershed table; XYZ is deliberately absent
pub fn watershed_frame() -> DataFrame {
    df!(
        "Station Code" => ["ABC1", "USJ"],
        "Area" => ["2.0", "3.0"]
    )
    .unwrap()
}

/// Raw sample table in wide layout
pub fn samples_frame() -> DataFrame {
    df!(
        "SITE" => ["ABC1", "ABC1", "ABC2", "ABC2", "XYZ", "XYZ"],
        "DATE" => ["1/15/2019", "1/15/2019", "7/4/2019", "7/4/2019", "2/1/2019", "2/1/2019"],
        "TIME" => ["10:00", "10:30", "12:00", "13:00", "08:00", "09:00"],
        "TYPE" => ["wet", "wet", "wet", "wet", "wet", "wet"],
        "SEASON" => ["Winter", "Winter", "Summer", "Summer", "Winter", "Winter"],
        "FLOWCMS" => ["0.05", "0.10", "0.20", "0.10", "0.02", "0.04"],
        "SIZE" => ["S", "S", "S", "S", "L", "L"],
        "GEO" => ["N", "N", "N", "N", "S", "S"],
        "TSS" => ["10", "20", "5", "15", "4", "8"],
        "Cu" => ["3.5", "2.5", "1.0", "<1", "2", "2"],
        "DFCu" => ["1.0", "1.0", "0.5", "0.5", "1.0", "1.0"]
    )
    .unwrap()
}

/// Sample table as it appears in a CSV file
pub const SAMPLES_CSV: &str = "\
SITE,DATE,TIME,TYPE,SEASON,FLOWCMS,SIZE,GEO,TSS,Cu,DFCu
ABC1,1/15/2019,10:00,wet,Winter,0.05,S,N,10,3.5,1.0
ABC1,1/15/2019,10:30,wet,Winter,0.10,S,N,20,2.5,1.0
XYZ,2/1/2019,08:00,wet,Winter,0.02,L,S,4,2,1.0
";

/// Watershed table as it appears in a CSV file, title row first
pub const WATERSHED_CSV: &str = "\
Watershed drainage areas (km2)
Station Code,Area,Notes
ABC1,2.0,gauged
USJ,3.0,
";
