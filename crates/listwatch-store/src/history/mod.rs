//! Append-only snapshot history on the local filesystem
//!
//! Provides:
//! - Atomic create-only writes (temp file + hard link)
//! - Latest selection by numeric fetch timestamp

mod atomic;
mod fs_store;

pub use fs_store::{FsSnapshotStore, SnapshotEntry};
