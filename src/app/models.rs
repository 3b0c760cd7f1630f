//! Data models for EMC processing
//!
//! This module contains the core data structures shared by every pipeline
//! stage: watershed reference records, long-format water-quality samples,
//! grouping keys for each analysis level, and the per-group EMC results.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::constants::{MG_TO_G, UG_TO_G, UNSUFFIXED_STORM};

// =============================================================================
// Measurement Units
// =============================================================================

/// Concentration unit of a constituent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mg/L")]
    MgPerL,
    #[serde(rename = "ug/L")]
    UgPerL,
}

impl Unit {
    /// Label used in result tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::MgPerL => "mg/L",
            Unit::UgPerL => "ug/L",
        }
    }

    /// Factor converting `litres x concentration` into grams
    pub fn grams_factor(&self) -> f64 {
        match self {
            Unit::MgPerL => MG_TO_G,
            Unit::UgPerL => UG_TO_G,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Storm Identifier
// =============================================================================

/// Storm identifier derived from the suffix of a raw site code
///
/// `ABC12` is storm 12 of site `ABC`. Codes without a suffix belong to the
/// sentinel storm [`UNSUFFIXED_STORM`]. Non-numeric suffixes are kept verbatim
/// and sort after every numbered storm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StormId {
    Number(u32),
    Label(String),
}

impl StormId {
    /// Parse the remainder of a site code once its leading letters are removed
    pub fn from_suffix(suffix: &str) -> Self {
        let suffix = suffix.trim();
        if suffix.is_empty() {
            return StormId::unsuffixed();
        }

        match suffix.parse::<u32>() {
            Ok(number) => StormId::Number(number),
            Err(_) => StormId::Label(suffix.to_string()),
        }
    }

    pub fn unsuffixed() -> Self {
        StormId::Number(UNSUFFIXED_STORM)
    }
}

impl fmt::Display for StormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StormId::Number(number) => write!(f, "{}", number),
            StormId::Label(label) => f.write_str(label),
        }
    }
}

// =============================================================================
// Input Records
// =============================================================================

/// Normalised watershed reference row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatershedRecord {
    /// Station code with numeric suffix removed and known typos corrected
    pub site_code: String,

    /// Drainage area in square kilometres
    pub area_km2: f64,
}

/// One concentration measurement in long format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRecord {
    /// Site code with storm suffix removed
    pub site: String,

    pub storm: StormId,

    /// Sampling time in the fixed local offset; `None` when unparseable
    pub timestamp: Option<DateTime<FixedOffset>>,

    /// Calendar year of `timestamp` in the local offset
    pub year: Option<i32>,

    /// Sample TYPE column (wet, dry, ...)
    pub sample_type: String,

    pub season: String,

    /// Instantaneous flow in m3/s
    pub flow_cms: Option<f64>,

    /// Drainage area joined from the watershed table; `None` on a join miss
    pub area_km2: Option<f64>,

    /// Constituent (VAR) name
    pub constituent: String,

    pub unit: Unit,

    /// Concentration in `unit`; `None` when unparseable
    pub value: Option<f64>,
}

impl SampleRecord {
    /// Whether this record can take part in the time-integrated mass balance
    pub fn is_usable(&self) -> bool {
        self.timestamp.is_some() && self.value.is_some() && self.flow_cms.is_some()
    }
}

// =============================================================================
// Grouping Keys
// =============================================================================

/// Grouping dimension of a sample record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Site,
    Storm,
    Unit,
    Area,
    Season,
    Year,
    SampleType,
    Constituent,
}

impl Dimension {
    /// Column name of this dimension in result tables
    pub fn column_name(&self) -> &'static str {
        match self {
            Dimension::Site => "site",
            Dimension::Storm => "storm",
            Dimension::Unit => "unit",
            Dimension::Area => "area_km2",
            Dimension::Season => "season",
            Dimension::Year => "year",
            Dimension::SampleType => "type",
            Dimension::Constituent => "constituent",
        }
    }
}

/// Aggregation level of an EMC result table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisLevel {
    /// Full key: one result per site, storm, season, year, type and constituent
    SiteStorm,
    /// Site dropped
    AllSites,
    /// Site and season dropped
    AllSitesAllSeasons,
    /// Site only
    Site,
    /// Constituent only
    Constituent,
}

impl AnalysisLevel {
    /// Every level, finest first
    pub const ALL: [AnalysisLevel; 5] = [
        AnalysisLevel::SiteStorm,
        AnalysisLevel::AllSites,
        AnalysisLevel::AllSitesAllSeasons,
        AnalysisLevel::Site,
        AnalysisLevel::Constituent,
    ];

    /// Levels derived from the site-storm table by roll-up
    pub const ROLLUPS: [AnalysisLevel; 4] = [
        AnalysisLevel::AllSites,
        AnalysisLevel::AllSitesAllSeasons,
        AnalysisLevel::Site,
        AnalysisLevel::Constituent,
    ];

    /// Active grouping dimensions, in output column order
    pub fn dimensions(&self) -> &'static [Dimension] {
        use Dimension::*;
        match self {
            AnalysisLevel::SiteStorm => &[
                Site,
                Storm,
                Unit,
                Area,
                Season,
                Year,
                SampleType,
                Constituent,
            ],
            AnalysisLevel::AllSites => &[Storm, Unit, Season, Year, SampleType, Constituent],
            AnalysisLevel::AllSitesAllSeasons => &[Storm, Unit, Year, SampleType, Constituent],
            AnalysisLevel::Site => &[Site],
            AnalysisLevel::Constituent => &[Constituent],
        }
    }

    pub fn has_dimension(&self, dimension: Dimension) -> bool {
        self.dimensions().contains(&dimension)
    }

    /// Whether results at this level are produced by rolling up finer results
    pub fn is_rollup(&self) -> bool {
        *self != AnalysisLevel::SiteStorm
    }

    /// File stem used when writing this level's table
    pub fn file_stem(&self) -> &'static str {
        match self {
            AnalysisLevel::SiteStorm => "site_storm",
            AnalysisLevel::AllSites => "all_sites",
            AnalysisLevel::AllSitesAllSeasons => "all_sites_all_seasons",
            AnalysisLevel::Site => "site",
            AnalysisLevel::Constituent => "constituent",
        }
    }
}

impl fmt::Display for AnalysisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for AnalysisLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        AnalysisLevel::ALL
            .into_iter()
            .find(|level| level.file_stem() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown analysis level '{}'. Valid levels: {}",
                    s,
                    AnalysisLevel::ALL
                        .iter()
                        .map(|level| level.file_stem())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Drainage area usable as a map key
///
/// Compares by bit pattern, so two areas are the same key only when they
/// are the same float. Ordering follows `f64::total_cmp`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AreaKey(pub f64);

impl PartialEq for AreaKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for AreaKey {}

impl Hash for AreaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for AreaKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AreaKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Key tuple of a group
///
/// Dimensions inactive at the key's analysis level are `None`. An active
/// dimension may also be `None` when the underlying value is null (a site
/// without watershed area, a sample without a parseable timestamp).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub site: Option<String>,
    pub storm: Option<StormId>,
    pub unit: Option<Unit>,
    pub area_km2: Option<AreaKey>,
    pub season: Option<String>,
    pub year: Option<i32>,
    pub sample_type: Option<String>,
    pub constituent: Option<String>,
}

impl GroupKey {
    /// Key of `record` at `level`
    pub fn for_record(record: &SampleRecord, level: AnalysisLevel) -> Self {
        let full = GroupKey {
            site: Some(record.site.clone()),
            storm: Some(record.storm.clone()),
            unit: Some(record.unit),
            area_km2: record.area_km2.map(AreaKey),
            season: Some(record.season.clone()),
            year: record.year,
            sample_type: Some(record.sample_type.clone()),
            constituent: Some(record.constituent.clone()),
        };
        full.project(level)
    }

    /// Keep only the dimensions active at `level`
    pub fn project(&self, level: AnalysisLevel) -> Self {
        let keep = |dimension| level.has_dimension(dimension);
        GroupKey {
            site: self.site.clone().filter(|_| keep(Dimension::Site)),
            storm: self.storm.clone().filter(|_| keep(Dimension::Storm)),
            unit: self.unit.filter(|_| keep(Dimension::Unit)),
            area_km2: self.area_km2.filter(|_| keep(Dimension::Area)),
            season: self.season.clone().filter(|_| keep(Dimension::Season)),
            year: self.year.filter(|_| keep(Dimension::Year)),
            sample_type: self.sample_type.clone().filter(|_| keep(Dimension::SampleType)),
            constituent: self.constituent.clone().filter(|_| keep(Dimension::Constituent)),
        }
    }

    /// Display value of one dimension, `None` when null or inactive
    pub fn value_of(&self, dimension: Dimension) -> Option<String> {
        match dimension {
            Dimension::Site => self.site.clone(),
            Dimension::Storm => self.storm.as_ref().map(ToString::to_string),
            Dimension::Unit => self.unit.map(|unit| unit.as_str().to_string()),
            Dimension::Area => self.area_km2.map(|area| area.0.to_string()),
            Dimension::Season => self.season.clone(),
            Dimension::Year => self.year.map(|year| year.to_string()),
            Dimension::SampleType => self.sample_type.clone(),
            Dimension::Constituent => self.constituent.clone(),
        }
    }

    /// Short human-readable label for logs and diagnostics
    pub fn label(&self) -> String {
        let parts: Vec<String> = [
            self.site.clone(),
            self.storm.as_ref().map(|storm| format!("storm {}", storm)),
            self.season.clone(),
            self.year.map(|year| year.to_string()),
            self.sample_type.clone(),
            self.constituent.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            "<all>".to_string()
        } else {
            parts.join("/")
        }
    }
}

// =============================================================================
// EMC Results
// =============================================================================

/// Metric derived from summed mass, volume, duration and area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    EmcGPerL,
    MassloadKgPerDay,
    FluxrateKgPerYrPerKm2,
}

impl Metric {
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::EmcGPerL => "emc_g_per_l",
            Metric::MassloadKgPerDay => "massload_kg_per_day",
            Metric::FluxrateKgPerYrPerKm2 => "fluxrate_kg_per_yr_per_km2",
        }
    }
}

/// EMC result of one group
///
/// `None` marks a quantity that is undefined for the group: no usable
/// samples, a guarded division, or a null watershed area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmcResult {
    pub key: GroupKey,

    /// Number of usable samples behind this result
    pub samples: usize,

    pub area_km2: Option<f64>,

    pub mass_emitted_g: Option<f64>,

    pub liters_total: Option<f64>,

    pub days_elapsed: Option<f64>,

    /// Flow-weighted mean concentration (g/L)
    pub emc_g_per_l: Option<f64>,

    /// Mass loading rate (kg/day)
    pub massload_kg_per_day: Option<f64>,

    /// Area-normalised flux rate (kg/yr/km2)
    pub fluxrate_kg_per_yr_per_km2: Option<f64>,
}

impl EmcResult {
    /// Derived metrics that came out null even though the group had samples
    pub fn guarded_metrics(&self) -> Vec<Metric> {
        if self.samples == 0 {
            return Vec::new();
        }

        [
            (Metric::EmcGPerL, self.emc_g_per_l),
            (Metric::MassloadKgPerDay, self.massload_kg_per_day),
            (Metric::FluxrateKgPerYrPerKm2, self.fluxrate_kg_per_yr_per_km2),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(metric, _)| metric)
        .collect()
    }
}

/// Flat result table of one analysis level, sorted by key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmcTable {
    pub level: AnalysisLevel,
    pub rows: Vec<EmcResult>,
}

impl EmcTable {
    pub fn new(level: AnalysisLevel, rows: Vec<EmcResult>) -> Self {
        Self { level, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the row whose key matches `predicate`
    pub fn find(&self, predicate: impl Fn(&GroupKey) -> bool) -> Option<&EmcResult> {
        self.rows.iter().find(|row| predicate(&row.key))
    }
}

// =============================================================================
// Data Issues
// =============================================================================

/// Non-fatal data problem recorded during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    /// `DATE TIME` of a sample row could not be parsed
    TimestampParse { row: usize, site: String, raw: String },

    /// Concentration cells that were present but not numeric
    ValueParse { constituent: String, count: usize },

    /// Flow cells that were present but not numeric
    FlowParse { row: usize, raw: String },

    /// Sample site without a watershed area
    JoinMiss { site: String },

    /// Watershed code listed with conflicting areas
    AmbiguousWatershed {
        site: String,
        areas: Vec<f64>,
        resolution: String,
    },

    /// A derived metric was null for a group with samples
    DivisionGuard {
        level: AnalysisLevel,
        group: String,
        metric: Metric,
    },
}

impl DataIssue {
    /// Short category name used in summaries
    pub fn category(&self) -> &'static str {
        match self {
            DataIssue::TimestampParse { .. } => "timestamp_parse",
            DataIssue::ValueParse { .. } => "value_parse",
            DataIssue::FlowParse { .. } => "flow_parse",
            DataIssue::JoinMiss { .. } => "join_miss",
            DataIssue::AmbiguousWatershed { .. } => "ambiguous_watershed",
            DataIssue::DivisionGuard { .. } => "division_guard",
        }
    }
}

impl fmt::Display for DataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataIssue::TimestampParse { row, site, raw } => {
                write!(f, "row {} ({}): unparseable timestamp '{}'", row, site, raw)
            }
            DataIssue::ValueParse { constituent, count } => {
                write!(f, "{}: {} non-numeric concentration values", constituent, count)
            }
            DataIssue::FlowParse { row, raw } => {
                write!(f, "row {}: non-numeric flow '{}'", row, raw)
            }
            DataIssue::JoinMiss { site } => {
                write!(f, "site {} has no watershed area", site)
            }
            DataIssue::AmbiguousWatershed {
                site,
                areas,
                resolution,
            } => write!(
                f,
                "watershed code {} listed with areas {:?} ({})",
                site, areas, resolution
            ),
            DataIssue::DivisionGuard {
                level,
                group,
                metric,
            } => write!(
                f,
                "{} {}: {} undefined",
                level,
                group,
                metric.column_name()
            ),
        }
    }
}
