//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;
use tracing::debug;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial
/// document. Parent directories are created as needed.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    debug!(path = %path, bytes = content.len(), "wrote file");
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    debug!(path = %path, "reading file");
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Remove a file. A file that is already gone is not an error.
///
/// Returns whether a file was actually removed.
pub fn remove_file(path: &NormalizedPath) -> Result<bool> {
    match fs::remove_file(path.to_native()) {
        Ok(()) => {
            debug!(path = %path, "removed file");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path.to_native(), e)),
    }
}

/// Remove a directory only when it exists and is empty.
///
/// Returns whether the directory was removed.
pub fn remove_dir_if_empty(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    let mut entries = match fs::read_dir(&native_path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io(&native_path, e)),
    };

    if entries.next().is_some() {
        return Ok(false);
    }

    fs::remove_dir(&native_path).map_err(|e| Error::io(&native_path, e))?;
    debug!(path = %path, "removed empty directory");
    Ok(true)
}

/// List the entries of a directory, sorted by path.
///
/// A missing directory yields an empty list.
pub fn list_dir(path: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native_path = path.to_native();
    let entries = match fs::read_dir(&native_path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(&native_path, e)),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_path, e))?;
        paths.push(NormalizedPath::new(entry.path()));
    }
    paths.sort();
    Ok(paths)
}
