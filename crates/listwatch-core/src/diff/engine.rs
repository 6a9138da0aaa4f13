//! Snapshot diff computation engine.
//!
//! [`compare`] decides whether there is anything to diff at all;
//! [`compute_diff`] partitions the new snapshot's records and annotates
//! changed cells.

use crate::diff::model::{CellChange, DiffOptions, DiffOutcome, ListingDiff};
use crate::errors::{ExError, ListingError, Result};
use crate::model::{Record, Snapshot};
use std::collections::BTreeSet;

/// Compare a freshly loaded snapshot with the latest persisted one.
///
/// - no previous snapshot: [`DiffOutcome::FirstObservation`]
/// - structurally equal: [`DiffOutcome::Unchanged`], without any per-cell work
/// - otherwise: [`DiffOutcome::Changed`] carrying [`compute_diff`]'s result
///
/// # Errors
///
/// - `Schema` if the snapshots belong to different markets or do not share
///   a column set
pub fn compare(
    new: &Snapshot,
    old: Option<&Snapshot>,
    options: &DiffOptions,
) -> Result<DiffOutcome> {
    let Some(old) = old else {
        return Ok(DiffOutcome::FirstObservation);
    };

    if new == old {
        return Ok(DiffOutcome::Unchanged);
    }

    compute_diff(new, old, options).map(DiffOutcome::Changed)
}

/// Ensure two snapshots can be compared cell by cell.
fn check_compatible(new: &Snapshot, old: &Snapshot) -> std::result::Result<(), ListingError> {
    if new.market() != old.market() {
        return Err(ListingError::MarketMismatch {
            new: new.market().to_string(),
            old: old.market().to_string(),
        });
    }

    if !new.same_column_set(old) {
        let a: BTreeSet<&str> = new.columns().iter().map(String::as_str).collect();
        let b: BTreeSet<&str> = old.columns().iter().map(String::as_str).collect();
        return Err(ListingError::ColumnMismatch {
            only_in_new: a.difference(&b).map(|s| s.to_string()).collect(),
            only_in_old: b.difference(&a).map(|s| s.to_string()).collect(),
        });
    }

    Ok(())
}

/// Differing cells of one record present in both snapshots, in column order.
fn changed_cells(new_record: &Record, old_record: &Record) -> Vec<CellChange> {
    new_record
        .cells()
        .iter()
        .filter_map(|cell| {
            // Column sets were checked, so the old record always has the column
            let old_value = old_record.get(&cell.column).flatten();
            if old_value == cell.value.as_deref() {
                return None;
            }
            Some(CellChange {
                uid: new_record.uid().to_string(),
                column: cell.column.clone(),
                old: old_value.map(str::to_string),
                new: cell.value.clone(),
            })
        })
        .collect()
}

/// Copy of `record` with every changed, present value suffixed by `marker`.
///
/// A value that changed to absent stays absent.
fn annotate(record: &Record, changes: &[CellChange], marker: &str) -> Record {
    let mut annotated = record.clone();
    for cell in annotated.cells_mut() {
        if changes.iter().any(|c| c.column == cell.column) {
            if let Some(value) = cell.value.as_mut() {
                value.push_str(marker);
            }
        }
    }
    annotated
}

/// Compute new and updated records of `new` relative to `old`.
///
/// Records whose uid is absent from `old` are new. Records present in both
/// with at least one differing cell are updated and returned in their new
/// form, with each differing present value suffixed by the update marker.
/// Records only present in `old` are ignored. Comparison is exact string
/// equality and treats an absent value as different from `""`.
///
/// # Errors
///
/// - `Schema` if the snapshots belong to different markets or do not share
///   a column set
pub fn compute_diff(new: &Snapshot, old: &Snapshot, options: &DiffOptions) -> Result<ListingDiff> {
    check_compatible(new, old).map_err(|e| ExError::from(e).with_op("compute_diff"))?;

    let mut new_records = Vec::new();
    let mut updated_records = Vec::new();
    let mut changes = Vec::new();

    for record in new.records() {
        match old.get(record.uid()) {
            None => new_records.push(record.clone()),
            Some(old_record) => {
                let record_changes = changed_cells(record, old_record);
                if record_changes.is_empty() {
                    continue;
                }
                updated_records.push(annotate(record, &record_changes, &options.update_marker));
                changes.extend(record_changes);
            }
        }
    }

    tracing::debug!(
        market = new.market().as_str(),
        new_count = new_records.len(),
        updated_count = updated_records.len(),
        changed_cells = changes.len(),
        "Computed snapshot diff"
    );

    Ok(ListingDiff {
        market: new.market(),
        new: (!new_records.is_empty()).then_some(new_records),
        updated: (!updated_records.is_empty()).then_some(updated_records),
        changes,
    })
}
