use clap::Parser;
use emc_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(&args) {
        Ok(_summary) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("EMC Processor - Stormwater Event Mean Concentrations");
    println!("====================================================");
    println!();
    println!("Compute flow-weighted event mean concentrations, mass loadings and");
    println!("area-normalised flux rates from water-quality and watershed tables.");
    println!();
    println!("USAGE:");
    println!("    emc-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run         Run the pipeline and write one table per analysis level");
    println!("    validate    Check the inputs and report data issues without writing");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Compute every analysis level as CSV:");
    println!("    emc-processor run --samples samples.csv --watershed watershed.csv -o results");
    println!();
    println!("    # Only the site and constituent roll-ups, as Parquet:");
    println!("    emc-processor run -s samples.csv -w watershed.csv \\");
    println!("                      --levels site,constituent --format parquet");
    println!();
    println!("    # Check inputs and print a JSON issue report:");
    println!("    emc-processor validate -s samples.csv -w watershed.csv --report json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    emc-processor <COMMAND> --help");
}
