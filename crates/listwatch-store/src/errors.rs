//! Error handling for listwatch-store
//!
//! Wraps listwatch-core ExError with store-specific helpers

use listwatch_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for `path`
///
/// `std::io::ErrorKind::AlreadyExists` keeps its own kind so callers can
/// tell a refused overwrite from a failing medium.
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    let kind = match err.kind() {
        std::io::ErrorKind::AlreadyExists => ExErrorKind::AlreadyExists,
        _ => ExErrorKind::Io,
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create an already-exists error for a snapshot artifact
pub fn artifact_exists(path: &Path) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op("persist")
        .with_path(path.display().to_string())
        .with_message("snapshot artifact already exists")
}

/// Create a parse error for an artifact that is not valid UTF-8
pub fn not_utf8(path: &Path, err: std::string::FromUtf8Error) -> ExError {
    ExError::new(ExErrorKind::Parse)
        .with_op("read_snapshot")
        .with_path(path.display().to_string())
        .with_message(format!("snapshot artifact is not valid UTF-8: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_keeps_its_kind() {
        let err = io_error(
            "write",
            Path::new("data/twse/x.csv"),
            std::io::Error::from(std::io::ErrorKind::AlreadyExists),
        );
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
        assert_eq!(err.path(), Some("data/twse/x.csv"));
    }

    #[test]
    fn test_other_io_failures_are_io() {
        let err = io_error(
            "read",
            Path::new("x"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.op(), Some("read"));
    }
}
