//! Command implementations for the EMC processor CLI
//!
//! Each command lives in its own module:
//! - `run`: full pipeline with result tables written to disk
//! - `validate`: input normalisation and data issue report only

pub mod run;
pub mod shared;
pub mod validate;

pub use shared::CommandSummary;

use crate::cli::args::{Args, Commands};
use anyhow::Result;

/// Dispatch to the handler of the given subcommand
pub fn run(args: &Args) -> Result<CommandSummary> {
    match args.get_command() {
        Some(Commands::Run(run_args)) => run::run_pipeline(run_args),
        Some(Commands::Validate(validate_args)) => validate::run_validate(validate_args),
        None => anyhow::bail!("No command given"),
    }
}
