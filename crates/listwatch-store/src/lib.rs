//! listwatch Store - filesystem persistence for snapshot history
//!
//! Provides:
//! - The data-folder layout (`<data>/<market>/`, `<data>/logs/`)
//! - Snapshot file naming keyed by fetch timestamp
//! - Atomic, never-overwriting writes
//! - [`FsSnapshotStore`], the durable `SnapshotStore` implementation

pub mod errors;
pub mod history;
pub mod layout;

// Re-export key types
pub use errors::Result;
pub use history::{FsSnapshotStore, SnapshotEntry};
pub use layout::DataLayout;
