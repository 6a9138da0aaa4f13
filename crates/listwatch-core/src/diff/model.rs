//! Diff output types.

use crate::model::{Market, Record};
use serde::{Deserialize, Serialize};

/// Suffix appended to every changed cell of an updated record
pub const DEFAULT_UPDATE_MARKER: &str = " (更新)";

/// Tunables for the diff engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Suffix appended to changed values in `updated` records
    pub update_marker: String,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            update_marker: DEFAULT_UPDATE_MARKER.to_string(),
        }
    }
}

/// One differing `(uid, column)` pair, with plain (unannotated) values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub uid: String,
    pub column: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Classification of a new snapshot relative to the previous one.
///
/// `new` and `updated` are `None` rather than empty so that callers emit
/// a report section only when there is something in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDiff {
    pub market: Market,
    /// Records whose uid is absent from the previous snapshot
    pub new: Option<Vec<Record>>,
    /// New versions of records with at least one changed cell; changed
    /// present values carry the update marker
    pub updated: Option<Vec<Record>>,
    /// Every differing cell, in new-snapshot row then column order
    pub changes: Vec<CellChange>,
}

impl ListingDiff {
    /// A diff with no new and no updated records
    pub fn empty(market: Market) -> Self {
        Self {
            market,
            new: None,
            updated: None,
            changes: Vec::new(),
        }
    }

    /// True when there is nothing to report
    pub fn is_empty(&self) -> bool {
        self.new.is_none() && self.updated.is_none()
    }

    pub fn new_count(&self) -> usize {
        self.new.as_ref().map_or(0, Vec::len)
    }

    pub fn updated_count(&self) -> usize {
        self.updated.as_ref().map_or(0, Vec::len)
    }
}

/// Result of comparing a fetched snapshot with the latest persisted one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// No previous snapshot exists: persist, report nothing
    FirstObservation,
    /// Structurally identical to the previous snapshot
    Unchanged,
    /// Structurally different. The diff may still be empty when the only
    /// difference is withdrawn records.
    Changed(ListingDiff),
}

impl DiffOutcome {
    /// Whether the fetched snapshot must be appended to the history
    pub fn should_persist(&self) -> bool {
        !matches!(self, DiffOutcome::Unchanged)
    }

    /// The diff to report, if there is anything to report
    pub fn reportable(&self) -> Option<&ListingDiff> {
        match self {
            DiffOutcome::Changed(diff) if !diff.is_empty() => Some(diff),
            _ => None,
        }
    }
}
