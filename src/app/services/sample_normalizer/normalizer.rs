//! Water-quality sample table normalisation
//!
//! Runs the raw wide sample table through a fixed sequence of stages, each a
//! function from one immutable value to the next:
//!
//! 1. [`drop_descriptor_columns`] - remove SIZE/GEO style descriptors
//! 2. [`parse_sample_rows`] - timestamp, storm, site, year and flow per row
//! 3. [`attach_watershed_area`] - left join of drainage area by site
//! 4. [`reshape_long`] - one record per (sample, constituent), dissolved
//!    fractions excluded, values parsed, units assigned

use super::timestamp::{combine_date_time, fixed_offset, parse_timestamp};
use super::units::UnitMap;
use crate::app::models::{DataIssue, SampleRecord, StormId, Unit};
use crate::app::services::field_parsers::{column_names, parse_optional_numeric, string_column};
use crate::app::services::watershed_normalizer::{
    WatershedTable, strip_leading_letters, strip_trailing_digits,
};
use crate::config::SampleConfig;
use crate::Result;
use chrono::{DateTime, Datelike, FixedOffset};
use polars::prelude::DataFrame;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

const TABLE: &str = "samples";

/// One raw sample row with its identifying fields parsed
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    /// Zero-based row index in the raw table
    pub row: usize,
    pub site: String,
    pub storm: StormId,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub year: Option<i32>,
    pub sample_type: String,
    pub season: String,
    pub flow_cms: Option<f64>,
    pub area_km2: Option<f64>,
}

/// Sample rows plus the raw constituent cells, still in wide layout
#[derive(Debug, Clone, Default)]
pub struct WideSamples {
    pub rows: Vec<SampleRow>,

    /// Constituent column names in table order
    pub constituents: Vec<String>,

    /// `cells[c][r]` is constituent `c` of raw row `rows[r].row`
    pub cells: Vec<Vec<Option<String>>>,

    /// Raw rows skipped for lacking a site code
    pub rows_dropped: usize,

    pub issues: Vec<DataIssue>,
}

/// Long-format samples ready for grouping
#[derive(Debug, Clone, Default)]
pub struct NormalizedSamples {
    pub records: Vec<SampleRecord>,

    /// Raw rows in the input
    pub rows_in: usize,

    /// Raw rows skipped for lacking a site code
    pub rows_dropped: usize,

    /// Constituents kept, in table order
    pub constituents: Vec<String>,

    /// Dissolved-fraction constituents excluded from the analysis
    pub dissolved_constituents: Vec<String>,

    /// Unit of every kept constituent
    pub units: BTreeMap<String, Unit>,

    /// Distinct normalised sites
    pub sites: BTreeSet<String>,

    pub issues: Vec<DataIssue>,
}

impl NormalizedSamples {
    /// Records whose timestamp could not be parsed
    pub fn unordered_records(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.timestamp.is_none())
            .count()
    }
}

/// Normalise the raw sample table into long-format records
pub fn normalize_samples(
    df: &DataFrame,
    watershed: &WatershedTable,
    config: &SampleConfig,
) -> Result<NormalizedSamples> {
    let trimmed = drop_descriptor_columns(df, config)?;
    let wide = parse_sample_rows(&trimmed, config)?;
    let wide = attach_watershed_area(wide, watershed);
    let normalized = reshape_long(wide, config, df.height());

    debug!(
        "Sample normalisation: {} rows -> {} records, {} constituents ({} dissolved excluded)",
        normalized.rows_in,
        normalized.records.len(),
        normalized.constituents.len(),
        normalized.dissolved_constituents.len()
    );

    Ok(normalized)
}

/// Remove descriptor columns that take no part in the analysis
pub fn drop_descriptor_columns(df: &DataFrame, config: &SampleConfig) -> Result<DataFrame> {
    let kept: Vec<String> = column_names(df)
        .into_iter()
        .filter(|name| !config.dropped_columns.iter().any(|dropped| dropped == name))
        .collect();

    Ok(df.select(kept)?)
}

/// Parse the identifying columns of every row
///
/// Rows without a site code are skipped. Unparseable timestamps and flows
/// become `None` and are recorded as issues.
pub fn parse_sample_rows(df: &DataFrame, config: &SampleConfig) -> Result<WideSamples> {
    let offset = fixed_offset(config.utc_offset_hours)?;

    let sites = string_column(df, TABLE, &config.site_column)?;
    let dates = string_column(df, TABLE, &config.date_column)?;
    let times = string_column(df, TABLE, &config.time_column)?;
    let types = string_column(df, TABLE, &config.type_column)?;
    let seasons = string_column(df, TABLE, &config.season_column)?;
    let flows = string_column(df, TABLE, &config.flow_column)?;

    let id_columns = config.id_columns();
    let constituents: Vec<String> = column_names(df)
        .into_iter()
        .filter(|name| !id_columns.contains(&name.as_str()))
        .collect();
    let raw_cells = constituents
        .iter()
        .map(|name| string_column(df, TABLE, name))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(df.height());
    let mut kept_rows = Vec::with_capacity(df.height());
    let mut issues = Vec::new();
    let mut rows_dropped = 0;

    for row in 0..df.height() {
        let Some(raw_site) = sites[row].as_deref() else {
            debug!("Skipping sample row {}: no site code", row);
            rows_dropped += 1;
            continue;
        };

        let site = strip_trailing_digits(raw_site);
        let storm = StormId::from_suffix(&strip_leading_letters(raw_site));

        let combined = combine_date_time(dates[row].as_deref(), times[row].as_deref());
        let timestamp = combined
            .as_deref()
            .and_then(|raw| parse_timestamp(raw, &offset));
        if timestamp.is_none() {
            issues.push(DataIssue::TimestampParse {
                row,
                site: raw_site.to_string(),
                raw: combined.unwrap_or_default(),
            });
        }

        let (flow_cms, flow_failed) = parse_optional_numeric(flows[row].as_deref());
        if flow_failed {
            issues.push(DataIssue::FlowParse {
                row,
                raw: flows[row].clone().unwrap_or_default(),
            });
        }

        rows.push(SampleRow {
            row,
            site,
            storm,
            year: timestamp.map(|ts| ts.year()),
            timestamp,
            sample_type: types[row].clone().unwrap_or_default(),
            season: seasons[row].clone().unwrap_or_default(),
            flow_cms,
            area_km2: None,
        });
        kept_rows.push(row);
    }

    let cells = raw_cells
        .into_iter()
        .map(|column| kept_rows.iter().map(|&row| column[row].clone()).collect())
        .collect();

    let timestamp_failures = issues
        .iter()
        .filter(|issue| matches!(issue, DataIssue::TimestampParse { .. }))
        .count();
    if timestamp_failures > 0 {
        warn!(
            "{} sample rows have unparseable timestamps and are excluded from EMC calculation",
            timestamp_failures
        );
    }

    Ok(WideSamples {
        rows,
        constituents,
        cells,
        rows_dropped,
        issues,
    })
}

/// Left-join drainage area onto each row by normalised site code
///
/// Sites missing from the watershed table keep a `None` area and are
/// reported once each.
pub fn attach_watershed_area(mut wide: WideSamples, watershed: &WatershedTable) -> WideSamples {
    let mut missing = BTreeSet::new();

    for row in &mut wide.rows {
        row.area_km2 = watershed.area(&row.site);
        if row.area_km2.is_none() {
            missing.insert(row.site.clone());
        }
    }

    for site in missing {
        warn!("No watershed area for site {}; flux rates will be null", site);
        wide.issues.push(DataIssue::JoinMiss { site });
    }

    wide
}

/// Reshape wide rows into one record per (sample, constituent)
///
/// Dissolved-fraction constituents are excluded before any value is read.
pub fn reshape_long(wide: WideSamples, config: &SampleConfig, rows_in: usize) -> NormalizedSamples {
    let unit_map = UnitMap::new(&config.mg_per_l_constituents);
    let WideSamples {
        rows,
        constituents,
        cells,
        rows_dropped,
        mut issues,
    } = wide;

    let mut kept = Vec::new();
    let mut dissolved_constituents = Vec::new();
    for (name, column) in constituents.into_iter().zip(cells) {
        if name.starts_with(&config.dissolved_prefix) {
            dissolved_constituents.push(name);
        } else {
            kept.push((name, column));
        }
    }

    let units = unit_map.resolve(kept.iter().map(|(name, _)| name.as_str()));
    let mut records = Vec::with_capacity(rows.len() * kept.len());

    for (row_index, row) in rows.iter().enumerate() {
        for (name, column) in &kept {
            let (value, _) = parse_optional_numeric(column[row_index].as_deref());
            records.push(SampleRecord {
                site: row.site.clone(),
                storm: row.storm.clone(),
                timestamp: row.timestamp,
                year: row.year,
                sample_type: row.sample_type.clone(),
                season: row.season.clone(),
                flow_cms: row.flow_cms,
                area_km2: row.area_km2,
                constituent: name.clone(),
                unit: units[name],
                value,
            });
        }
    }

    for (name, column) in &kept {
        let count = column
            .iter()
            .filter(|cell| parse_optional_numeric(cell.as_deref()).1)
            .count();
        if count > 0 {
            debug!("{}: {} non-numeric values set to null", name, count);
            issues.push(DataIssue::ValueParse {
                constituent: name.clone(),
                count,
            });
        }
    }

    let sites = rows.iter().map(|row| row.site.clone()).collect();

    NormalizedSamples {
        records,
        rows_in,
        rows_dropped,
        constituents: kept.into_iter().map(|(name, _)| name).collect(),
        dissolved_constituents,
        units,
        sites,
        issues,
    }
}
