//! Error handling for EMC processing operations.
//!
//! Only conditions that make a run meaningless are errors here. Row-level
//! problems (unparseable timestamps, missing watershed areas, zero volumes)
//! are recorded as [`DataIssue`](crate::app::models::DataIssue)s instead and
//! never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the EMC processor
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// A column required by a normaliser is absent from its input table
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: String, column: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Two watershed rows normalise to the same code with different areas
    #[error("Ambiguous watershed area for site '{site}': {first} km2 vs {second} km2")]
    AmbiguousWatershed {
        site: String,
        first: f64,
        second: f64,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a missing column error
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    pub fn ambiguous_watershed(site: impl Into<String>, first: f64, second: f64) -> Self {
        Self::AmbiguousWatershed {
            site: site.into(),
            first,
            second,
        }
    }

    /// Whether this error stems from user-supplied settings rather than data
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::ConfigParse { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
