//! Tests for the EMC calculator


use crate::app::models::{SampleRecord, StormId, Unit};
use chrono::{DateTime, FixedOffset, TimeZone};

/// Timestamp on 15 January 2019 in the UTC-8 sampling offset
pub fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::west_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2019, 1, 15, hour, minute, 0)
        .unwrap()
}

/// Usable sample of site ABC, storm 1
pub fn sample(
    timestamp: DateTime<FixedOffset>,
    flow_cms: f64,
    value: f64,
    unit: Unit,
) -> SampleRecord {
    SampleRecord {
        site: "ABC".to_string(),
        storm: StormId::Number(1),
        timestamp: Some(timestamp),
        year: Some(2019),
        sample_type: "wet".to_string(),
        season: "Winter".to_string(),
        flow_cms: Some(flow_cms),
        area_km2: Some(2.0),
        constituent: "TSS".to_string(),
        unit,
        value: Some(value),
    }
}
