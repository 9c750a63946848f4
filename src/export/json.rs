//! Atomic JSON writer and reader.

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error_handling::PersistenceError;

/// Serializes `value` as 2-space indented JSON and atomically replaces `path`.
///
/// Missing parent directories are created. The data goes to a temporary file
/// in the destination directory first and is then renamed over `path`, so the
/// target either keeps its old contents or holds the complete new document.
///
/// # Errors
///
/// Returns a `PersistenceError` naming the path that could not be created,
/// serialized or written.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    value: &T,
    path: &Path,
) -> Result<(), PersistenceError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let data = serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let write_err = |source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&data).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    log::debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Reads and deserializes a JSON document.
///
/// # Errors
///
/// Returns `PersistenceError::Read` or `PersistenceError::Deserialize`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let data = std::fs::read(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| PersistenceError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}
