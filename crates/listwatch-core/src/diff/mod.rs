//! Snapshot diff engine.
//!
//! Compares a freshly fetched snapshot against the latest persisted one
//! and classifies its records as new, updated or unchanged.
//!
//! ## Entry point
//!
//! ```ignore
//! use listwatch_core::diff::{compare, DiffOptions, DiffOutcome};
//!
//! match compare(&fetched, previous.as_ref(), &DiffOptions::default())? {
//!     DiffOutcome::FirstObservation => { /* persist, report nothing */ }
//!     DiffOutcome::Unchanged => { /* do nothing */ }
//!     DiffOutcome::Changed(diff) => { /* render, notify, persist */ }
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Idempotence**: comparing a snapshot with itself is `Unchanged`.
//! - **Deletion blindness**: uids only present in the old snapshot never
//!   appear in the result.
//! - **Disjointness**: no uid is both new and updated.
//! - **Annotation locality**: only differing cells carry the update marker.
//! - **Determinism**: output follows the new snapshot's row order.

pub mod engine;
pub mod model;

pub use engine::{compare, compute_diff};
pub use model::{CellChange, DiffOptions, DiffOutcome, ListingDiff, DEFAULT_UPDATE_MARKER};
