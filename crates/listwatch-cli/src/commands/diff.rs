//! Compare two local CSV files

use crate::commands::load_local;
use crate::LogFormat;
use clap::Args;
use listwatch_core::diff::{compute_diff, DiffOptions, DEFAULT_UPDATE_MARKER};
use listwatch_core::logging_facility;
use listwatch_core::model::Market;
use listwatch_core::render::render_market_report;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous snapshot or feed file
    pub old: PathBuf,

    /// Current snapshot or feed file
    pub new: PathBuf,

    #[arg(long)]
    pub market: Market,

    /// Suffix appended to changed values
    #[arg(long, default_value = DEFAULT_UPDATE_MARKER)]
    pub marker: String,

    /// Print the structured diff as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: DiffArgs, log_format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    logging_facility::init(log_format.profile());

    let old = load_local(&args.old, args.market)?;
    let new = load_local(&args.new, args.market)?;
    let options = DiffOptions {
        update_marker: args.marker,
    };
    let diff = compute_diff(&new, &old, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else if diff.is_empty() {
        println!("No new or updated applications");
    } else {
        print!("{}", render_market_report(args.market, &diff));
    }
    Ok(())
}
