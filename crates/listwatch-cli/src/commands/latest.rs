//! Show the latest persisted snapshot of a market

use crate::LogFormat;
use clap::Args;
use listwatch_core::errors::{ExError, ExErrorKind};
use listwatch_core::logging_facility;
use listwatch_core::model::Market;
use listwatch_core::snapshot::{content_digest, SnapshotStore};
use listwatch_store::{DataLayout, FsSnapshotStore};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct LatestArgs {
    #[arg(long)]
    pub market: Market,

    /// Root of the snapshot history
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,
}

pub fn execute(args: LatestArgs, log_format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    logging_facility::init(log_format.profile());

    let store = FsSnapshotStore::new(DataLayout::new(&args.data_dir));
    let latest = store.latest(args.market)?.ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_op("latest")
            .with_market(args.market.as_str())
            .with_path(args.data_dir.display().to_string())
            .with_message("no snapshot history")
    })?;

    println!("path: {}", latest.location);
    println!("fetched_at: {}", latest.fetched_at);
    println!("rows: {}", latest.snapshot.len());
    println!("digest: {}", content_digest(&latest.snapshot)?);
    Ok(())
}
