//! listwatch CLI
//!
//! Command-line interface for listwatch

use clap::{Parser, Subcommand, ValueEnum};
use listwatch_core::logging_facility::Profile;

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Human,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub fn profile(self) -> Profile {
        match self {
            LogFormat::Human => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "listwatch")]
#[command(about = "listwatch - TWSE/TPEx listing application change reports", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, compare, report and persist each market once
    Run(commands::run::RunArgs),
    /// Compare two local CSV files and print the change report
    Diff(commands::diff::DiffArgs),
    /// Show the latest persisted snapshot of a market
    Latest(commands::latest::LatestArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args, cli.log_format),
        Commands::Diff(args) => commands::diff::execute(args, cli.log_format),
        Commands::Latest(args) => commands::latest::execute(args, cli.log_format),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
