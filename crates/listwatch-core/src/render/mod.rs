//! Plain-text rendering of diff results for notification channels.

pub mod report;

pub use report::{render_market_report, render_report, NEW_SECTION_HEADER, UPDATED_SECTION_HEADER};
