//! Command-line argument definitions for the EMC processor
//!
//! Defines the CLI using the clap derive API. Flags given here override the
//! values loaded from the configuration file.

use crate::app::models::AnalysisLevel;
use crate::config::{ConflictPolicy, EmcConfig, TableFormat};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the EMC processor
///
/// Computes flow-weighted event mean concentrations, mass loadings and
/// area-normalised flux rates from stormwater sampling and watershed tables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "emc-processor",
    version,
    about = "Compute stormwater event mean concentrations, mass loadings and flux rates",
    long_about = "Joins watershed drainage areas onto time-series water-quality samples, \
                  integrates mass and volume per site, storm and constituent, and rolls the \
                  results up to coarser levels by ratio of sums. Writes one table per \
                  analysis level as CSV or Parquet."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write result tables
    Run(RunArgs),
    /// Normalise the inputs and report data issues without writing results
    Validate(ValidateArgs),
}

/// Input and logging arguments shared by every command
#[derive(Debug, Clone, Parser)]
pub struct InputArgs {
    /// Water-quality sample table (CSV)
    ///
    /// One row per sample with SITE, DATE, TIME, TYPE, SEASON and FLOWCMS
    /// columns followed by one column per constituent.
    #[arg(
        short = 's',
        long = "samples",
        value_name = "FILE",
        help = "Water-quality sample table (CSV)"
    )]
    pub samples: PathBuf,

    /// Watershed reference table (CSV)
    ///
    /// Must contain station code and drainage area columns below a title row.
    #[arg(
        short = 'w',
        long = "watershed",
        value_name = "FILE",
        help = "Watershed reference table (CSV)"
    )]
    pub watershed: PathBuf,

    /// Path to configuration file
    ///
    /// TOML configuration file for column names, unit assignment and output
    /// settings. If not specified, looks for <config dir>/emc-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Lines to skip above the watershed table header
    #[arg(
        long = "watershed-skip-rows",
        value_name = "COUNT",
        help = "Lines to skip above the watershed table header"
    )]
    pub watershed_skip_rows: Option<usize>,

    /// How to treat watershed codes listed with conflicting areas
    #[arg(
        long = "conflict-policy",
        value_enum,
        help = "Resolution for watershed codes with conflicting areas"
    )]
    pub conflict_policy: Option<ConflictPolicyArg>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides the progress bar.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Report format printed when the command finishes
    #[arg(
        long = "report",
        value_enum,
        default_value = "human",
        help = "Format of the run report"
    )]
    pub report: ReportFormat,
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory for result tables
    ///
    /// Created if it doesn't exist. Files are named after their analysis
    /// level: site_storm, all_sites, all_sites_all_seasons, site, constituent.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Directory for result tables"
    )]
    pub output_dir: Option<PathBuf>,

    /// Result table file format
    #[arg(
        long = "format",
        value_enum,
        help = "Result table file format"
    )]
    pub format: Option<TableFormatArg>,

    /// Analysis levels to write (comma-separated list)
    #[arg(
        short = 'l',
        long = "levels",
        value_name = "LIST",
        help = "Comma-separated analysis levels to write",
        long_help = "Analysis levels to write as a comma-separated list.\n\
                     Available levels:\n  \
                     site_storm, all_sites, all_sites_all_seasons, site, constituent\n\n\
                     If not specified, every level is written."
    )]
    pub levels: Option<LevelList>,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Run report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    Human,
    /// JSON for scripting
    Json,
}

/// Result table formats accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormatArg {
    Csv,
    Parquet,
}

impl From<TableFormatArg> for TableFormat {
    fn from(arg: TableFormatArg) -> Self {
        match arg {
            TableFormatArg::Csv => TableFormat::Csv,
            TableFormatArg::Parquet => TableFormat::Parquet,
        }
    }
}

/// Conflict policies accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConflictPolicyArg {
    /// Drop the code; its samples get no area
    Discard,
    /// Keep the first area listed
    FirstWins,
    /// Abort the run
    Reject,
}

impl From<ConflictPolicyArg> for ConflictPolicy {
    fn from(arg: ConflictPolicyArg) -> Self {
        match arg {
            ConflictPolicyArg::Discard => ConflictPolicy::Discard,
            ConflictPolicyArg::FirstWins => ConflictPolicy::FirstWins,
            ConflictPolicyArg::Reject => ConflictPolicy::Reject,
        }
    }
}

/// Wrapper for parsing comma-separated analysis level lists
#[derive(Debug, Clone, PartialEq)]
pub struct LevelList {
    pub levels: Vec<AnalysisLevel>,
}

impl FromStr for LevelList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut levels = Vec::new();
        for name in s.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let level = name.parse::<AnalysisLevel>().map_err(Error::configuration)?;
            if !levels.contains(&level) {
                levels.push(level);
            }
        }

        if levels.is_empty() {
            return Err(Error::configuration("Level list cannot be empty"));
        }

        Ok(LevelList { levels })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<&Commands> {
        self.command.as_ref()
    }
}

impl InputArgs {
    /// Check that both input files exist
    pub fn validate(&self) -> Result<()> {
        for path in [&self.samples, &self.watershed] {
            if !path.exists() {
                return Err(Error::input_not_found(path));
            }
            if !path.is_file() {
                return Err(Error::configuration(format!(
                    "Input path is not a file: {}",
                    path.display()
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Load configuration and apply the input overrides
    pub fn load_config(&self) -> Result<EmcConfig> {
        let mut config = EmcConfig::load_layered(self.config_file.as_deref())?;

        if let Some(skip_rows) = self.watershed_skip_rows {
            config = config.with_watershed_skip_rows(skip_rows);
        }
        if let Some(policy) = self.conflict_policy {
            config = config.with_conflict_policy(policy.into());
        }

        Ok(config)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.report == ReportFormat::Human
    }
}

impl RunArgs {
    /// Full configuration for a run: file values overridden by flags
    pub fn build_config(&self) -> Result<EmcConfig> {
        let mut config = self.input.load_config()?;

        if let Some(output_dir) = &self.output_dir {
            config = config.with_output_directory(output_dir.clone());
        }
        if let Some(format) = self.format {
            config = config.with_format(format.into());
        }
        if let Some(levels) = &self.levels {
            config = config.with_levels(levels.levels.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn input_args(samples: PathBuf, watershed: PathBuf) -> InputArgs {
        InputArgs {
            samples,
            watershed,
            config_file: None,
            watershed_skip_rows: None,
            conflict_policy: None,
            verbose: 0,
            quiet: false,
            report: ReportFormat::Human,
        }
    }

    #[test]
    fn test_level_list_parsing() {
        let result = LevelList::from_str("site_storm").unwrap();
        assert_eq!(result.levels, vec![AnalysisLevel::SiteStorm]);

        let result = LevelList::from_str(" all-sites , constituent,all_sites ").unwrap();
        assert_eq!(
            result.levels,
            vec![AnalysisLevel::AllSites, AnalysisLevel::Constituent]
        );

        assert!(LevelList::from_str("watershed").is_err());
        assert!(LevelList::from_str("").is_err());
        assert!(LevelList::from_str(",,,").is_err());
    }

    #[test]
    fn test_parse_run_command() {
        let args = Args::try_parse_from([
            "emc-processor",
            "run",
            "--samples",
            "samples.csv",
            "--watershed",
            "watershed.csv",
            "-o",
            "out",
            "--format",
            "parquet",
            "--levels",
            "site,constituent",
            "-vv",
        ])
        .unwrap();

        let Some(Commands::Run(run)) = args.get_command() else {
            panic!("expected run command");
        };
        assert_eq!(run.input.samples, PathBuf::from("samples.csv"));
        assert_eq!(run.output_dir, Some(PathBuf::from("out")));
        assert_eq!(run.format, Some(TableFormatArg::Parquet));
        assert_eq!(
            run.levels.as_ref().unwrap().levels,
            vec![AnalysisLevel::Site, AnalysisLevel::Constituent]
        );
        assert_eq!(run.input.get_log_level(), "debug");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from([
            "emc-processor",
            "validate",
            "-s",
            "a.csv",
            "-w",
            "b.csv",
            "-q",
            "-v",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = input_args(PathBuf::from("a"), PathBuf::from("b"));
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_json_report_hides_progress() {
        let mut args = input_args(PathBuf::from("a"), PathBuf::from("b"));
        assert!(args.show_progress());

        args.report = ReportFormat::Json;
        assert!(!args.show_progress());
    }

    #[test]
    fn test_input_validation() {
        let temp_dir = TempDir::new().unwrap();
        let samples = temp_dir.path().join("samples.csv");
        let watershed = temp_dir.path().join("watershed.csv");
        fs::write(&samples, "SITE\n").unwrap();

        let args = input_args(samples.clone(), watershed.clone());
        assert!(matches!(
            args.validate().unwrap_err(),
            Error::InputNotFound { .. }
        ));

        fs::write(&watershed, "Station Code,Area\n").unwrap();
        assert!(input_args(samples, watershed).validate().is_ok());

        let args = input_args(temp_dir.path().to_path_buf(), temp_dir.path().to_path_buf());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[watershed]\nskip_rows = 3\n\n[output]\nformat = \"parquet\"\n",
        )
        .unwrap();

        let mut input = input_args(PathBuf::from("a"), PathBuf::from("b"));
        input.config_file = Some(config_path);
        input.conflict_policy = Some(ConflictPolicyArg::FirstWins);

        let run = RunArgs {
            input,
            output_dir: Some(temp_dir.path().join("out")),
            format: None,
            levels: Some(LevelList {
                levels: vec![AnalysisLevel::Site],
            }),
        };
        let config = run.build_config().unwrap();

        assert_eq!(config.watershed.skip_rows, 3);
        assert_eq!(config.watershed.conflict_policy, ConflictPolicy::FirstWins);
        assert_eq!(config.output.format, TableFormat::Parquet);
        assert_eq!(config.output.directory, temp_dir.path().join("out"));
        assert_eq!(config.output.levels, vec![AnalysisLevel::Site]);
    }
}
