//! Filesystem-backed snapshot store

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, not_utf8, Result};
use crate::history::atomic::atomic_create;
use crate::layout::{parse_snapshot_file_name, DataLayout};
use listwatch_core::model::{Market, Snapshot};
use listwatch_core::snapshot::{encode_csv, load_persisted, FetchTimestamp, SnapshotStore, StoredSnapshot};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// One persisted snapshot file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub fetched_at: FetchTimestamp,
    pub path: PathBuf,
}

/// Snapshot history stored as one CSV file per fetch under
/// `<data>/<market>/`
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    layout: DataLayout,
}

impl FsSnapshotStore {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// All snapshot files of a market, oldest first. Files that do not
    /// follow the naming scheme are skipped.
    ///
    /// # Errors
    ///
    /// - `Io` if the market directory exists but cannot be read
    pub fn list(&self, market: Market) -> Result<Vec<SnapshotEntry>> {
        let dir = self.layout.market_dir(market);
        let read_dir = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_snapshots", &dir, e)),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| io_error("list_snapshots", &dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            match parse_snapshot_file_name(market, name) {
                Some(fetched_at) => entries.push(SnapshotEntry {
                    fetched_at,
                    path: entry.path(),
                }),
                None => tracing::debug!(
                    market = market.as_str(),
                    file = name,
                    "Ignoring non-snapshot file"
                ),
            }
        }

        entries.sort_by_key(|e| e.fetched_at);
        Ok(entries)
    }

    /// Load the snapshot stored in `entry`
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read
    /// - `Parse`/`Schema` if its content is not a persisted snapshot
    pub fn read(&self, market: Market, entry: &SnapshotEntry) -> Result<Snapshot> {
        let bytes = fs::read(&entry.path).map_err(|e| io_error("read_snapshot", &entry.path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| not_utf8(&entry.path, e))?;
        load_persisted(&text, market).map_err(|e| e.with_path(entry.path.display().to_string()))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn latest(&self, market: Market) -> Result<Option<StoredSnapshot>> {
        let Some(entry) = self.list(market)?.pop() else {
            tracing::debug!(market = market.as_str(), "No snapshot history");
            return Ok(None);
        };

        let snapshot = self.read(market, &entry)?;
        tracing::debug!(
            market = market.as_str(),
            path = %entry.path.display(),
            row_count = snapshot.len(),
            "Loaded latest snapshot"
        );

        Ok(Some(StoredSnapshot {
            snapshot,
            fetched_at: entry.fetched_at,
            location: entry.path.display().to_string(),
        }))
    }

    fn persist(&self, snapshot: &Snapshot, fetched_at: FetchTimestamp) -> Result<String> {
        let market = snapshot.market();
        let path = self.layout.snapshot_path(market, fetched_at);
        let bytes = encode_csv(snapshot)?;

        atomic_create(&path, &bytes).map_err(|e| e.with_market(market.as_str()))?;

        tracing::debug!(
            market = market.as_str(),
            path = %path.display(),
            bytes = bytes.len(),
            "Persisted snapshot"
        );
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listwatch_core::model::{Cell, Record};
    use tempfile::TempDir;

    fn setup() -> (FsSnapshotStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FsSnapshotStore::new(DataLayout::new(dir.path()));
        (store, dir)
    }

    fn snapshot(status: &str) -> Snapshot {
        Snapshot::new(
            Market::Twse,
            vec!["進度".to_string()],
            vec![Record::new(
                "1101-20240101",
                vec![Cell::new("進度", Some(status.to_string()))],
            )],
        )
        .unwrap()
    }

    fn ts(s: &str) -> FetchTimestamp {
        FetchTimestamp::parse(s).unwrap()
    }

    #[test]
    fn test_latest_on_empty_store_is_none() {
        let (store, _dir) = setup();
        assert!(store.latest(Market::Twse).unwrap().is_none());
        assert!(store.list(Market::Twse).unwrap().is_empty());
    }

    #[test]
    fn test_persist_then_latest() {
        let (store, _dir) = setup();
        let snap = snapshot("審議中");
        let location = store.persist(&snap, ts("20240101090000")).unwrap();
        assert!(location.ends_with("twse_listing_20240101090000.csv"));

        let latest = store.latest(Market::Twse).unwrap().unwrap();
        assert_eq!(latest.snapshot, snap);
        assert_eq!(latest.fetched_at, ts("20240101090000"));
        assert_eq!(latest.location, location);
    }

    #[test]
    fn test_list_is_sorted_by_timestamp() {
        let (store, _dir) = setup();
        store.persist(&snapshot("b"), ts("20240102000000")).unwrap();
        store.persist(&snapshot("a"), ts("20240101000000")).unwrap();

        let stamps: Vec<String> = store
            .list(Market::Twse)
            .unwrap()
            .iter()
            .map(|e| e.fetched_at.to_string())
            .collect();
        assert_eq!(stamps, vec!["20240101000000", "20240102000000"]);
    }
}
