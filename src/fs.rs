// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use std::path::Path;

/// Two-line marker keeping the reset directories out of version control.
pub const IGNORE_MARKER: &str = "*\n!.gitignore\n";

/// Atomically write data to a file using a temporary file and rename.
/// This prevents race conditions where a file is read while being written.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    use std::fs;
    use std::io::Write;

    // Create temp file in same directory to ensure same filesystem (required for atomic rename)
    let parent = path
        .parent()
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;

    // Generate random temp filename
    let random_suffix: u64 = rand::Rng::random(&mut rand::rng());
    let temp_path = parent.join(format!(".tmp-{:x}", random_suffix));

    // Write to temp file
    let mut file = fs::File::create(&temp_path).map_err(|e| Error::WriteFile {
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(contents).map_err(|e| Error::WriteFile {
        path: temp_path.clone(),
        source: e,
    })?;

    // Ensure data is flushed to disk before rename
    file.sync_all().map_err(|e| Error::WriteFile {
        path: temp_path.clone(),
        source: e,
    })?;

    drop(file); // Close file before rename

    // Atomic rename (overwrites destination atomically)
    fs::rename(&temp_path, path).map_err(|e| {
        // Clean up temp file on error - but only if it still exists
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }
        Error::WriteFile {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(())
}

/// Recursively remove a directory, treating absence as success.
pub fn remove_dir_ignore_missing(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Delete and recreate a directory, seeding it with the ignore marker.
pub fn reset_dir(path: &Path) -> Result<()> {
    remove_dir_ignore_missing(path)?;

    std::fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })?;

    let marker = path.join(".gitignore");
    std::fs::write(&marker, IGNORE_MARKER).map_err(|e| Error::WriteFile {
        path: marker,
        source: e,
    })
}

/// True when the directory holds anything besides the ignore marker.
pub fn dir_has_state(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    let entries = std::fs::read_dir(path).map_err(|e| Error::ReadDir {
        path: path.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::ReadDir {
            path: path.to_path_buf(),
            source: e,
        })?;
        if entry.file_name() != ".gitignore" {
            return Ok(true);
        }
    }

    Ok(false)
}
