//! At-rest encoding of a snapshot.
//!
//! The persisted form is the same CSV dialect the feeds use, with the uid
//! as the first column. [`crate::snapshot::load::load_persisted`] reads it
//! back; absent values are written as empty fields.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::Snapshot;
use crate::snapshot::load::UID_COLUMN;
use sha2::{Digest, Sha256};

/// Encode a snapshot as UTF-8 CSV bytes: header `uid,<columns...>`, rows in
/// snapshot order, `\n` line terminators.
///
/// # Errors
///
/// - `Serialization` if the CSV writer fails
pub fn encode_csv(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let serialization_error = |e: &dyn std::fmt::Display| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("encode_csv")
            .with_market(snapshot.market().as_str())
            .with_message(format!("Failed to encode snapshot: {}", e))
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(
            std::iter::once(UID_COLUMN).chain(snapshot.columns().iter().map(String::as_str)),
        )
        .map_err(|e| serialization_error(&e))?;

    for record in snapshot.records() {
        let values = record
            .cells()
            .iter()
            .map(|cell| cell.value.as_deref().unwrap_or(""));
        writer
            .write_record(std::iter::once(record.uid()).chain(values))
            .map_err(|e| serialization_error(&e))?;
    }

    writer.into_inner().map_err(|e| serialization_error(&e))
}

/// SHA-256 (hex) of the snapshot's encoded form, used to identify
/// snapshots in log events.
///
/// # Errors
///
/// - `Serialization` if encoding fails
pub fn content_digest(snapshot: &Snapshot) -> Result<String> {
    let bytes = encode_csv(snapshot)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
