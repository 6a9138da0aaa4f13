//! Immutable, uid-keyed listing snapshot.

use crate::errors::ListingError;
use crate::model::market::Market;
use crate::model::record::Record;
use std::collections::{BTreeSet, HashMap};

/// One full fetch of a market's listing-application table
///
/// Invariants enforced at construction:
/// - uids are unique
/// - every record's cells follow the snapshot's column order exactly
///
/// A snapshot is never mutated after construction.
#[derive(Debug, Clone)]
pub struct Snapshot {
    market: Market,
    columns: Vec<String>,
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    /// Build a snapshot, validating uid uniqueness and cell alignment.
    ///
    /// # Errors
    ///
    /// - `DuplicateUid` if two records share a uid
    /// - `ColumnMismatch` if a record's cells do not match `columns`
    pub fn new(
        market: Market,
        columns: Vec<String>,
        records: Vec<Record>,
    ) -> Result<Self, ListingError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if !record.columns().eq(columns.iter().map(String::as_str)) {
                let record_cols: BTreeSet<&str> = record.columns().collect();
                let snapshot_cols: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
                return Err(ListingError::ColumnMismatch {
                    only_in_new: record_cols
                        .difference(&snapshot_cols)
                        .map(|s| s.to_string())
                        .collect(),
                    only_in_old: snapshot_cols
                        .difference(&record_cols)
                        .map(|s| s.to_string())
                        .collect(),
                });
            }
            if index.insert(record.uid().to_string(), pos).is_some() {
                return Err(ListingError::DuplicateUid {
                    uid: record.uid().to_string(),
                });
            }
        }

        Ok(Self {
            market,
            columns,
            records,
            index,
        })
    }

    pub fn market(&self) -> Market {
        self.market
    }

    /// Schema columns in order, excluding the uid
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records in the order they appeared in the source table
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, uid: &str) -> Option<&Record> {
        self.index.get(uid).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.index.contains_key(uid)
    }

    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(Record::uid)
    }

    /// True when both snapshots carry the same column names, ignoring order
    pub fn same_column_set(&self, other: &Snapshot) -> bool {
        let a: BTreeSet<&str> = self.columns.iter().map(String::as_str).collect();
        let b: BTreeSet<&str> = other.columns.iter().map(String::as_str).collect();
        a == b
    }
}

/// Structural equality: same market, same column set, same uid set, and
/// identical values for every (uid, column). Row and column order are
/// ignored. An absent value never equals a present one, even `""`.
impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        if self.market != other.market
            || self.records.len() != other.records.len()
            || !self.same_column_set(other)
        {
            return false;
        }

        self.records.iter().all(|record| match other.get(record.uid()) {
            Some(theirs) => record
                .cells()
                .iter()
                .all(|cell| theirs.get(&cell.column) == Some(cell.value.as_deref())),
            None => false,
        })
    }
}

impl Eq for Snapshot {}
