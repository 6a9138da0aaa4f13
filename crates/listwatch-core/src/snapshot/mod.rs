//! Snapshot loading, at-rest encoding, fetch timestamps and the store
//! interface.

pub mod encode;
pub mod load;
pub mod store;
pub mod timestamp;

pub use encode::{content_digest, encode_csv};
pub use load::{load_feed, load_persisted};
pub use store::{MemorySnapshotStore, SnapshotStore, StoredSnapshot};
pub use timestamp::FetchTimestamp;
