//! Configuration management and validation.
//!
//! Provides configuration structures for the input table layouts, the
//! normalisation rules and the result output. Configuration is layered:
//! defaults, then an optional TOML file, then CLI overrides.

use crate::app::models::AnalysisLevel;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DROPPED_COLUMNS, DEFAULT_OUTPUT_DIR,
    DEFAULT_UTC_OFFSET_HOURS, DEFAULT_WATERSHED_SKIP_ROWS, DISSOLVED_FRACTION_PREFIX,
    MG_PER_L_CONSTITUENTS, SITE_CODE_CORRECTIONS, sample_columns, watershed_columns,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolution of watershed codes listed with conflicting areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Remove the code; its samples get a null area
    #[default]
    Discard,
    /// Keep the first area listed
    FirstWins,
    /// Abort the run
    Reject,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Discard => "discarded",
            ConflictPolicy::FirstWins => "first area kept",
            ConflictPolicy::Reject => "rejected",
        }
    }
}

/// File format of written result tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    #[default]
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Parquet => "parquet",
        }
    }
}

/// Watershed reference table layout and normalisation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatershedConfig {
    /// Column holding the station code
    pub station_code_column: String,

    /// Column holding the drainage area in km2
    pub area_column: String,

    /// Rows preceding the header line
    pub skip_rows: usize,

    /// Exact code rewrites applied after suffix stripping
    pub code_corrections: BTreeMap<String, String>,

    pub conflict_policy: ConflictPolicy,
}

impl Default for WatershedConfig {
    fn default() -> Self {
        Self {
            station_code_column: watershed_columns::STATION_CODE.to_string(),
            area_column: watershed_columns::AREA.to_string(),
            skip_rows: DEFAULT_WATERSHED_SKIP_ROWS,
            code_corrections: SITE_CODE_CORRECTIONS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

/// Water-quality sample table layout and normalisation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub site_column: String,
    pub date_column: String,
    pub time_column: String,
    pub type_column: String,
    pub season_column: String,
    pub flow_column: String,

    /// Descriptor columns removed before reshaping
    pub dropped_columns: Vec<String>,

    /// Constituents starting with this prefix are excluded entirely
    pub dissolved_prefix: String,

    /// Fixed offset of the sampling clock from UTC, in hours
    pub utc_offset_hours: i32,

    /// Constituents measured in mg/L; all others are ug/L
    pub mg_per_l_constituents: Vec<String>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            site_column: sample_columns::SITE.to_string(),
            date_column: sample_columns::DATE.to_string(),
            time_column: sample_columns::TIME.to_string(),
            type_column: sample_columns::TYPE.to_string(),
            season_column: sample_columns::SEASON.to_string(),
            flow_column: sample_columns::FLOW_CMS.to_string(),
            dropped_columns: DEFAULT_DROPPED_COLUMNS
                .iter()
                .map(|column| column.to_string())
                .collect(),
            dissolved_prefix: DISSOLVED_FRACTION_PREFIX.to_string(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            mg_per_l_constituents: MG_PER_L_CONSTITUENTS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl SampleConfig {
    /// Columns that identify a sample rather than hold a constituent
    pub fn id_columns(&self) -> [&str; 6] {
        [
            &self.site_column,
            &self.date_column,
            &self.time_column,
            &self.type_column,
            &self.season_column,
            &self.flow_column,
        ]
    }
}

/// Result table output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub format: TableFormat,

    /// Analysis levels to write
    pub levels: Vec<AnalysisLevel>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: TableFormat::default(),
            levels: AnalysisLevel::ALL.to_vec(),
        }
    }
}

/// Global configuration for EMC processing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmcConfig {
    pub watershed: WatershedConfig,
    pub samples: SampleConfig,
    pub output: OutputConfig,
}

impl EmcConfig {
    /// Default configuration file location
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config_parse(origin, e))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::input_not_found(path));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        let config = Self::from_toml_str(&text, path)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit file, else the default location if present, else defaults
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_file {
            return Self::load(path);
        }

        match Self::default_config_path() {
            Ok(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("watershed.station_code_column", &self.watershed.station_code_column),
            ("watershed.area_column", &self.watershed.area_column),
            ("samples.site_column", &self.samples.site_column),
            ("samples.date_column", &self.samples.date_column),
            ("samples.time_column", &self.samples.time_column),
            ("samples.type_column", &self.samples.type_column),
            ("samples.season_column", &self.samples.season_column),
            ("samples.flow_column", &self.samples.flow_column),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::configuration(format!("{} must not be empty", name)));
            }
        }

        if !(-23..=23).contains(&self.samples.utc_offset_hours) {
            return Err(Error::configuration(format!(
                "samples.utc_offset_hours must be between -23 and 23, got {}",
                self.samples.utc_offset_hours
            )));
        }

        if self.samples.dissolved_prefix.is_empty() {
            return Err(Error::configuration(
                "samples.dissolved_prefix must not be empty",
            ));
        }

        if self.output.levels.is_empty() {
            return Err(Error::configuration(
                "output.levels must name at least one analysis level",
            ));
        }

        Ok(())
    }

    pub fn with_output_directory(mut self, directory: PathBuf) -> Self {
        self.output.directory = directory;
        self
    }

    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.output.format = format;
        self
    }

    pub fn with_levels(mut self, levels: Vec<AnalysisLevel>) -> Self {
        self.output.levels = levels;
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.watershed.conflict_policy = policy;
        self
    }

    pub fn with_watershed_skip_rows(mut self, skip_rows: usize) -> Self {
        self.watershed.skip_rows = skip_rows;
        self
    }
}
