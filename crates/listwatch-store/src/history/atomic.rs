//! Atomic create-only write primitive
//!
//! Content goes to a uniquely named temp file in the target directory and
//! is then hard-linked to the target name. Linking fails if the target
//! exists, so readers never see a partial file and nothing is overwritten.
//! Filesystems without hard links get a create-new open of the target
//! instead, which still never overwrites.

#![allow(clippy::result_large_err)]

use crate::errors::{artifact_exists, io_error, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4()))
}

/// Write `content` to a file that must not exist yet
fn create_new_with(target_path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target_path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// Atomically create `target_path` with `content`
///
/// # Errors
///
/// - `AlreadyExists` if `target_path` exists
/// - `Io` if the directory, temp file or link cannot be written
pub fn atomic_create(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_snapshot_dir", parent, e))?;
    }

    if target_path.exists() {
        return Err(artifact_exists(target_path));
    }

    let temp_path = temp_path_for(target_path);
    fs::write(&temp_path, content).map_err(|e| io_error("write_snapshot_temp", &temp_path, e))?;

    let linked = fs::hard_link(&temp_path, target_path);
    if let Err(e) = fs::remove_file(&temp_path) {
        tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
    }

    match linked {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::Unsupported => {
            tracing::debug!(
                path = %target_path.display(),
                "Hard links unsupported, writing in place"
            );
            create_new_with(target_path, content).map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => artifact_exists(target_path),
                _ => io_error("write_snapshot", target_path, e),
            })
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(artifact_exists(target_path)),
        Err(e) => Err(io_error("link_snapshot", target_path, e)),
    }
}
