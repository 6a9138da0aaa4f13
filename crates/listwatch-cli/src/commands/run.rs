//! Run one fetch-compare-report-persist cycle per market

use crate::LogFormat;
use clap::Args;
use listwatch_core::diff::{DiffOptions, DEFAULT_UPDATE_MARKER};
use listwatch_core::fetcher::{FeedFetcher, StaticFeedFetcher};
use listwatch_core::logging_facility;
use listwatch_core::model::Market;
use listwatch_core::notifier::{Notifier, StdoutNotifier};
use listwatch_core::snapshot::FetchTimestamp;
use listwatch_core_types::Sensitive;
use listwatch_engine::transport::{HttpFeedFetcher, LineNotifier};
use listwatch_engine::{run_cycles, CycleContext, CycleOutcome, CycleReport, SystemClock};
use listwatch_store::{DataLayout, FsSnapshotStore};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Root of the snapshot history and log folder
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Market to process; repeat for several (default: all)
    #[arg(long = "market")]
    pub markets: Vec<Market>,

    /// Print reports to stdout instead of sending them to LINE. Snapshots
    /// are still persisted, so a previewed change is not sent by a later run
    #[arg(long)]
    pub dry_run: bool,

    /// LINE Notify access token
    #[arg(long, env = "LINE_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Suffix appended to changed values
    #[arg(long, default_value = DEFAULT_UPDATE_MARKER)]
    pub marker: String,

    /// HTTP timeout in seconds for feed downloads and notifications
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Read a market's feed from a local file instead of downloading it,
    /// as MARKET=PATH; repeatable
    #[arg(long = "feed-file", value_parser = parse_feed_file)]
    pub feed_files: Vec<(Market, PathBuf)>,
}

fn parse_feed_file(s: &str) -> Result<(Market, PathBuf), String> {
    let (market, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MARKET=PATH, got `{}`", s))?;
    let market = market.parse::<Market>().map_err(|e| e.to_string())?;
    Ok((market, PathBuf::from(path)))
}

fn build_fetcher(
    args: &RunArgs,
    timeout: Duration,
) -> Result<Box<dyn FeedFetcher>, Box<dyn std::error::Error>> {
    if args.feed_files.is_empty() {
        return Ok(Box::new(HttpFeedFetcher::new(timeout)?));
    }
    let mut fetcher = StaticFeedFetcher::new();
    for (market, path) in &args.feed_files {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read feed file {}: {}", path.display(), e))?;
        fetcher = fetcher.with_feed(*market, text);
    }
    Ok(Box::new(fetcher))
}

fn build_notifier(
    args: &RunArgs,
    timeout: Duration,
) -> Result<Box<dyn Notifier>, Box<dyn std::error::Error>> {
    if args.dry_run {
        return Ok(Box::new(StdoutNotifier));
    }
    let token = args
        .token
        .clone()
        .ok_or("LINE access token required (--token or LINE_ACCESS_TOKEN) unless --dry-run")?;
    Ok(Box::new(LineNotifier::new(Sensitive::new(token), timeout)?))
}

fn describe(report: &CycleReport) -> String {
    let what = match report.outcome {
        CycleOutcome::FirstObservation => "first observation".to_string(),
        CycleOutcome::Unchanged => "unchanged".to_string(),
        CycleOutcome::Changed {
            new_count,
            updated_count,
        } => format!("{} new, {} updated", new_count, updated_count),
    };
    match &report.persisted_to {
        Some(path) => format!("{}: {}, persisted {}", report.market, what, path),
        None => format!("{}: {}", report.market, what),
    }
}

pub fn execute(args: RunArgs, log_format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let layout = DataLayout::new(&args.data_dir);
    layout.ensure()?;

    let log_path = layout.log_file_path(&FetchTimestamp::now().date_part());
    logging_facility::init_with_file(log_format.profile(), &log_path)?;

    let timeout = Duration::from_secs(args.timeout_secs);
    let fetcher = build_fetcher(&args, timeout)?;
    let notifier = build_notifier(&args, timeout)?;
    let store = FsSnapshotStore::new(layout);

    let markets = if args.markets.is_empty() {
        Market::ALL.to_vec()
    } else {
        args.markets.clone()
    };

    let ctx = CycleContext {
        fetcher: fetcher.as_ref(),
        store: &store,
        notifier: notifier.as_ref(),
        clock: &SystemClock,
        diff_options: DiffOptions {
            update_marker: args.marker.clone(),
        },
    };

    let mut failed = 0;
    for (market, result) in run_cycles(&markets, &ctx) {
        match result {
            Ok(report) => {
                println!("{}", describe(&report));
                if let Some(e) = &report.notify_error {
                    eprintln!("Warning: {}: report not delivered: {}", market, e);
                }
            }
            Err(e) => {
                eprintln!("Error: {}: {}", market, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} market cycle(s) failed", failed, markets.len()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_file() {
        let (market, path) = parse_feed_file("TPEX=feeds/tpex.csv").unwrap();
        assert_eq!(market, Market::Tpex);
        assert_eq!(path, PathBuf::from("feeds/tpex.csv"));
        assert!(parse_feed_file("tpex").is_err());
        assert!(parse_feed_file("nyse=x.csv").is_err());
    }
}
