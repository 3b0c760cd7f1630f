//! Application constants for the EMC processor
//!
//! Column names of the raw input tables, the fixed unit-conversion factors
//! of the mass balance, and the default normalisation rules.

// =============================================================================
// Water-Quality Table Columns
// =============================================================================

/// Raw water-quality sample table column names
pub mod sample_columns {
    pub const SITE: &str = "SITE";
    pub const DATE: &str = "DATE";
    pub const TIME: &str = "TIME";
    pub const TYPE: &str = "TYPE";
    pub const SEASON: &str = "SEASON";
    pub const FLOW_CMS: &str = "FLOWCMS";

    /// Size descriptor, dropped before reshaping
    pub const SIZE: &str = "SIZE";
    /// Geography descriptor, dropped before reshaping
    pub const GEO: &str = "GEO";
}

/// Columns removed from the sample table before reshaping
pub const DEFAULT_DROPPED_COLUMNS: &[&str] = &[sample_columns::SIZE, sample_columns::GEO];

/// Constituent name prefix marking a dissolved-fraction measurement
pub const DISSOLVED_FRACTION_PREFIX: &str = "DF";

// =============================================================================
// Watershed Table Columns
// =============================================================================

pub mod watershed_columns {
    pub const STATION_CODE: &str = "Station Code";
    pub const AREA: &str = "Area";
}

/// Header rows preceding the column names in the watershed reference table
pub const DEFAULT_WATERSHED_SKIP_ROWS: usize = 1;

/// Known station-code typos in the watershed reference table
pub const SITE_CODE_CORRECTIONS: &[(&str, &str)] = &[("USJ", "USJC")];

// =============================================================================
// Time Handling
// =============================================================================

/// Sampling clock offset from UTC in hours (Pacific Standard Time, no DST)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -8;

/// Accepted layouts for the combined `DATE TIME` string, tried in order.
///
/// Two-digit years come first: `%Y` would otherwise accept "19" as year 19.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Storm number given to sites whose code carries no numeric suffix
pub const UNSUFFIXED_STORM: u32 = 1;

// =============================================================================
// Units and Mass Balance
// =============================================================================

/// Constituents reported in mg/L; every other constituent is in ug/L
pub const MG_PER_L_CONSTITUENTS: &[&str] = &[
    "TSS", "SSC", "TDS", "TOC", "DOC", "BOD", "COD", "TN", "TKN", "TP", "NO3", "NO2", "NH3",
    "NH4", "PO4", "OP", "SO4", "CL", "CA", "MG", "NA", "K", "HARDNESS", "ALKALINITY", "OG",
];

/// Cubic metres per second to litres per minute
pub const LITERS_PER_MINUTE_PER_CMS: f64 = 60.0 * 1000.0;

/// Contributing duration assumed for the first sample of a series
pub const FIRST_SAMPLE_MINUTES: f64 = 1.0;

pub const MG_TO_G: f64 = 1e-3;
pub const UG_TO_G: f64 = 1e-6;
pub const G_TO_KG: f64 = 1e-3;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

// =============================================================================
// Output
// =============================================================================

/// Default directory for result tables
pub const DEFAULT_OUTPUT_DIR: &str = "emc_output";

/// Name of the configuration directory under the user config dir
pub const CONFIG_DIR_NAME: &str = "emc-processor";
pub const CONFIG_FILE_NAME: &str = "config.toml";
