//! A single listing-application row.

use serde::{Deserialize, Serialize};

/// One column value of a record; `None` is an absent (empty) cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub column: String,
    pub value: Option<String>,
}

impl Cell {
    pub fn new(column: impl Into<String>, value: Option<String>) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// A listing-application entry keyed by its uid
///
/// Cells keep the snapshot's column order. The uid itself is not a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    uid: String,
    cells: Vec<Cell>,
}

impl Record {
    pub fn new(uid: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            uid: uid.into(),
            cells,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Look up a cell by column name.
    ///
    /// Returns `None` when the column does not exist, `Some(None)` when the
    /// column exists but the value is absent.
    pub fn get(&self, column: &str) -> Option<Option<&str>> {
        self.cells
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.value.as_deref())
    }

    /// Present value of a column, flattening "missing column" and "absent value"
    pub fn value(&self, column: &str) -> Option<&str> {
        self.get(column).flatten()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.column.as_str())
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}
