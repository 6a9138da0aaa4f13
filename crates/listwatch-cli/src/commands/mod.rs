pub mod diff;
pub mod latest;
pub mod run;

use listwatch_core::errors::{ExError, ExErrorKind};
use listwatch_core::model::{Market, Snapshot};
use listwatch_core::snapshot::load::UID_COLUMN;
use listwatch_core::snapshot::{load_feed, load_persisted};
use std::path::Path;

/// Read a local CSV file as a snapshot. Files whose first header is `uid`
/// are persisted snapshots; anything else is treated as a raw feed.
pub fn load_local(path: &Path, market: Market) -> Result<Snapshot, ExError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("read_local")
            .with_path(path.display().to_string())
            .with_message(e.to_string())
    })?;

    let loaded = if first_header(&text).as_deref() == Some(UID_COLUMN) {
        load_persisted(&text, market)
    } else {
        load_feed(&text, market)
    };
    loaded.map_err(|e| e.with_path(path.display().to_string()))
}

/// First header field of a CSV text, unquoted
fn first_header(text: &str) -> Option<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    reader.headers().ok()?.get(0).map(str::to_string)
}
