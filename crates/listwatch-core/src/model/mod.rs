//! Listing domain model: markets, records and snapshots.

pub mod market;
pub mod record;
pub mod snapshot;

pub use market::{Market, MarketConfig};
pub use record::{Cell, Record};
pub use snapshot::Snapshot;
