//! listwatch Core - snapshot diff and change-report kernel
//!
//! This crate provides the pure, I/O-free heart of listwatch:
//! - Market table and the uid-keyed listing model
//! - CSV loading of market feeds and persisted snapshots
//! - Structural comparison and per-cell diff with update annotation
//! - Plain-text report rendering
//! - Collaborator traits for fetching feeds, notifying and storing snapshots
//! - The canonical error and logging facilities shared by all crates

pub mod diff;
pub mod errors;
pub mod fetcher;
pub mod logging_facility;
pub mod model;
pub mod notifier;
pub mod render;
pub mod snapshot;

// Re-export commonly used types
pub use diff::{compare, compute_diff, DiffOptions, DiffOutcome, ListingDiff};
pub use errors::{ExError, ExErrorKind, ListingError, Result};
pub use fetcher::{FeedFetcher, StaticFeedFetcher};
pub use model::{Market, Record, Snapshot};
pub use notifier::{FailingNotifier, Notifier, RecordingNotifier, StdoutNotifier};
pub use render::{render_market_report, render_report};
pub use snapshot::{load_feed, load_persisted, FetchTimestamp, SnapshotStore, StoredSnapshot};
