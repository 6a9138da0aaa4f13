//! Snapshot store interface.
//!
//! History is append-only: every persisted snapshot is a new artifact
//! named by market and fetch timestamp, and "latest" is the artifact with
//! the greatest timestamp. The filesystem implementation lives in the
//! `listwatch-store` crate; [`MemorySnapshotStore`] backs tests.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{Market, Snapshot};
use crate::snapshot::encode::encode_csv;
use crate::snapshot::load::load_persisted;
use crate::snapshot::timestamp::FetchTimestamp;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A snapshot read back from the store together with where it came from
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    pub snapshot: Snapshot,
    pub fetched_at: FetchTimestamp,
    /// Store-specific location (a path for the filesystem store)
    pub location: String,
}

/// Durable, append-only snapshot history keyed by market and timestamp
#[allow(clippy::result_large_err)]
pub trait SnapshotStore: Send + Sync {
    /// Most recent persisted snapshot for the market, or `None` if the
    /// market has no history yet.
    ///
    /// # Errors
    ///
    /// Store failures (`Io`, `Persistence`), or `Parse`/`Schema` if the
    /// latest artifact cannot be loaded.
    fn latest(&self, market: Market) -> Result<Option<StoredSnapshot>>;

    /// Persist a snapshot under the given fetch timestamp and return its
    /// location. Never overwrites an existing artifact.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` when an artifact with the same market and timestamp
    /// exists; `Io`/`Persistence`/`Serialization` on write failure.
    fn persist(&self, snapshot: &Snapshot, fetched_at: FetchTimestamp) -> Result<String>;
}

/// In-memory store holding encoded snapshots, so that reads go through the
/// same at-rest format as the filesystem store.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    artifacts: Mutex<BTreeMap<(Market, FetchTimestamp), Vec<u8>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of artifacts persisted for a market
    pub fn count(&self, market: Market) -> usize {
        self.artifacts
            .lock()
            .map(|a| a.keys().filter(|(m, _)| *m == market).count())
            .unwrap_or(0)
    }

    fn location(market: Market, fetched_at: FetchTimestamp) -> String {
        format!("memory://{}/{}", market, fetched_at)
    }

    fn poisoned(op: &str) -> ExError {
        ExError::new(ExErrorKind::Internal)
            .with_op(op.to_string())
            .with_message("memory store lock poisoned")
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn latest(&self, market: Market) -> Result<Option<StoredSnapshot>> {
        let artifacts = self.artifacts.lock().map_err(|_| Self::poisoned("latest"))?;
        let Some(((_, fetched_at), bytes)) = artifacts
            .range((market, FetchTimestamp::MIN)..=(market, FetchTimestamp::MAX))
            .next_back()
        else {
            return Ok(None);
        };

        let text = std::str::from_utf8(bytes).map_err(|e| {
            ExError::new(ExErrorKind::Parse)
                .with_op("latest")
                .with_market(market.as_str())
                .with_message(format!("artifact is not valid UTF-8: {}", e))
        })?;

        Ok(Some(StoredSnapshot {
            snapshot: load_persisted(text, market)?,
            fetched_at: *fetched_at,
            location: Self::location(market, *fetched_at),
        }))
    }

    fn persist(&self, snapshot: &Snapshot, fetched_at: FetchTimestamp) -> Result<String> {
        let market = snapshot.market();
        let bytes = encode_csv(snapshot)?;
        let mut artifacts = self.artifacts.lock().map_err(|_| Self::poisoned("persist"))?;
        let location = Self::location(market, fetched_at);
        if artifacts.contains_key(&(market, fetched_at)) {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("persist")
                .with_market(market.as_str())
                .with_path(location)
                .with_message("snapshot artifact already exists"));
        }
        artifacts.insert((market, fetched_at), bytes);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Record};

    fn snapshot(market: Market, status: &str) -> Snapshot {
        Snapshot::new(
            market,
            vec!["status".to_string()],
            vec![Record::new(
                "1101-20240101",
                vec![Cell::new("status", Some(status.to_string()))],
            )],
        )
        .unwrap()
    }

    fn ts(s: &str) -> FetchTimestamp {
        FetchTimestamp::parse(s).unwrap()
    }

    #[test]
    fn test_latest_empty_store() {
        let store = MemorySnapshotStore::new();
        assert!(store.latest(Market::Twse).unwrap().is_none());
    }

    #[test]
    fn test_latest_picks_greatest_timestamp_per_market() {
        let store = MemorySnapshotStore::new();
        store
            .persist(&snapshot(Market::Twse, "old"), ts("20240101000000"))
            .unwrap();
        store
            .persist(&snapshot(Market::Twse, "new"), ts("20240102000000"))
            .unwrap();
        store
            .persist(&snapshot(Market::Tpex, "other"), ts("20240103000000"))
            .unwrap();

        let latest = store.latest(Market::Twse).unwrap().unwrap();
        assert_eq!(latest.fetched_at, ts("20240102000000"));
        assert_eq!(
            latest.snapshot.get("1101-20240101").unwrap().value("status"),
            Some("new")
        );
        assert_eq!(store.count(Market::Twse), 2);
    }

    #[test]
    fn test_persist_never_overwrites() {
        let store = MemorySnapshotStore::new();
        let at = ts("20240101000000");
        store.persist(&snapshot(Market::Twse, "a"), at).unwrap();
        let err = store.persist(&snapshot(Market::Twse, "b"), at).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }
}
