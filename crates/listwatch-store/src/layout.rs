//! Data-folder layout and snapshot file naming.
//!
//! ```text
//! <data>/
//!   twse/twse_listing_20240101093000.csv
//!   tpex/tpex_listing_20240101093000.csv
//!   logs/log_20240101.txt
//! ```

use crate::errors::{io_error, Result};
use listwatch_core::model::Market;
use listwatch_core::snapshot::FetchTimestamp;
use std::fs;
use std::path::{Path, PathBuf};

const LOGS_DIR: &str = "logs";
const SNAPSHOT_INFIX: &str = "_listing_";
const SNAPSHOT_EXTENSION: &str = ".csv";

/// `<market>_listing_<YYYYMMDDhhmmss>.csv`
pub fn snapshot_file_name(market: Market, fetched_at: FetchTimestamp) -> String {
    format!(
        "{}{}{}{}",
        market.as_str(),
        SNAPSHOT_INFIX,
        fetched_at,
        SNAPSHOT_EXTENSION
    )
}

/// Timestamp of a snapshot file name belonging to `market`, or `None` for
/// any other file.
pub fn parse_snapshot_file_name(market: Market, name: &str) -> Option<FetchTimestamp> {
    let stamp = name
        .strip_prefix(market.as_str())?
        .strip_prefix(SNAPSHOT_INFIX)?
        .strip_suffix(SNAPSHOT_EXTENSION)?;
    FetchTimestamp::parse(stamp)
}

/// Root of the on-disk snapshot history and logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn market_dir(&self, market: Market) -> PathBuf {
        self.root.join(market.as_str())
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    pub fn snapshot_path(&self, market: Market, fetched_at: FetchTimestamp) -> PathBuf {
        self.market_dir(market)
            .join(snapshot_file_name(market, fetched_at))
    }

    /// Daily log file for the local date `YYYYMMDD`
    pub fn log_file_path(&self, date: &str) -> PathBuf {
        self.logs_dir().join(format!("log_{}.txt", date))
    }

    /// Create the market directories and the log directory if missing.
    ///
    /// # Errors
    ///
    /// - `Io` if a directory cannot be created
    pub fn ensure(&self) -> Result<()> {
        for market in Market::ALL {
            let dir = self.market_dir(market);
            fs::create_dir_all(&dir).map_err(|e| io_error("ensure_layout", &dir, e))?;
        }
        let logs = self.logs_dir();
        fs::create_dir_all(&logs).map_err(|e| io_error("ensure_layout", &logs, e))?;
        Ok(())
    }
}
