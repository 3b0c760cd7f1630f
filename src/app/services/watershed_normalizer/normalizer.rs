//! Watershed reference table normalisation
//!
//! Turns the raw watershed table into a site code → drainage area lookup,
//! resolving duplicate codes according to the configured [`ConflictPolicy`].

use super::site_code::normalize_site_code;
use crate::app::models::{DataIssue, WatershedRecord};
use crate::app::services::field_parsers::{parse_numeric, string_column};
use crate::config::{ConflictPolicy, WatershedConfig};
use crate::{Error, Result};
use polars::prelude::DataFrame;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const TABLE: &str = "watershed";

/// Normalised site code → drainage area lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatershedTable {
    areas: BTreeMap<String, f64>,
}

impl WatershedTable {
    pub fn from_records(records: impl IntoIterator<Item = WatershedRecord>) -> Self {
        Self {
            areas: records
                .into_iter()
                .map(|record| (record.site_code, record.area_km2))
                .collect(),
        }
    }

    /// Drainage area of a normalised site code
    pub fn area(&self, site_code: &str) -> Option<f64> {
        self.areas.get(site_code).copied()
    }

    pub fn contains(&self, site_code: &str) -> bool {
        self.areas.contains_key(site_code)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Records in site code order
    pub fn records(&self) -> Vec<WatershedRecord> {
        self.areas
            .iter()
            .map(|(site_code, area_km2)| WatershedRecord {
                site_code: site_code.clone(),
                area_km2: *area_km2,
            })
            .collect()
    }
}

/// Result of normalising the watershed table
#[derive(Debug, Clone, Default)]
pub struct NormalizedWatershed {
    pub table: WatershedTable,

    /// Raw rows in the input
    pub rows_in: usize,

    /// Rows dropped for a missing code or a missing/non-numeric area
    pub rows_dropped: usize,

    pub issues: Vec<DataIssue>,
}

/// Normalise the raw watershed table
///
/// Selects the code and area columns, drops incomplete rows, strips code
/// suffixes, applies code corrections and coerces areas to numbers. Codes
/// repeated with the same area collapse to one entry; codes repeated with
/// different areas are resolved by `config.conflict_policy`.
pub fn normalize_watershed(df: &DataFrame, config: &WatershedConfig) -> Result<NormalizedWatershed> {
    let codes = string_column(df, TABLE, &config.station_code_column)?;
    let areas = string_column(df, TABLE, &config.area_column)?;

    let mut rows_dropped = 0;
    let mut candidates: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for (code, area) in codes.iter().zip(areas.iter()) {
        let (Some(code), Some(area)) = (code, area) else {
            rows_dropped += 1;
            continue;
        };

        let Some(area_km2) = parse_numeric(area) else {
            debug!("Dropping watershed row {}: non-numeric area '{}'", code, area);
            rows_dropped += 1;
            continue;
        };

        let site_code = normalize_site_code(code, &config.code_corrections);
        let entry = candidates.entry(site_code.clone()).or_default();
        if entry.is_empty() {
            first_seen.push(site_code);
        }
        if !entry.iter().any(|existing| existing.to_bits() == area_km2.to_bits()) {
            entry.push(area_km2);
        }
    }

    let mut records = Vec::with_capacity(first_seen.len());
    let mut issues = Vec::new();

    for site_code in first_seen {
        let areas = candidates.remove(&site_code).unwrap_or_default();
        match areas.as_slice() {
            [] => {}
            [area_km2] => records.push(WatershedRecord {
                site_code,
                area_km2: *area_km2,
            }),
            [first, second, ..] => {
                if config.conflict_policy == ConflictPolicy::Reject {
                    return Err(Error::ambiguous_watershed(site_code, *first, *second));
                }

                warn!(
                    "Watershed code {} has conflicting areas {:?}: {}",
                    site_code,
                    areas,
                    config.conflict_policy.as_str()
                );
                if config.conflict_policy == ConflictPolicy::FirstWins {
                    records.push(WatershedRecord {
                        site_code: site_code.clone(),
                        area_km2: *first,
                    });
                }
                issues.push(DataIssue::AmbiguousWatershed {
                    site: site_code,
                    areas: areas.clone(),
                    resolution: config.conflict_policy.as_str().to_string(),
                });
            }
        }
    }

    let table = WatershedTable::from_records(records);
    debug!(
        "Watershed normalisation: {} rows -> {} sites ({} dropped, {} conflicts)",
        df.height(),
        table.len(),
        rows_dropped,
        issues.len()
    );

    Ok(NormalizedWatershed {
        table,
        rows_in: df.height(),
        rows_dropped,
        issues,
    })
}
