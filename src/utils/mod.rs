use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::JournalError;

pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        info!("Creating directory {:?}...", dir);
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

// Writes bytes under a fresh uuid name, keeping the original extension
pub fn save_bytes(
    dir: &Path,
    original_filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, JournalError> {
    let extension = Path::new(original_filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("bin");

    let file_name = format!("{}.{}", Uuid::new_v4(), extension);
    let file_path = dir.join(&file_name);

    ensure_dir(dir).map_err(|e| {
        JournalError::StorageError(format!("Failed to create directory {:?}: {}", dir, e))
    })?;

    let mut file = fs::File::create(&file_path).map_err(|e| {
        JournalError::StorageError(format!("Failed to create file {:?}: {}", file_path, e))
    })?;
    file.write_all(bytes).map_err(|e| {
        JournalError::StorageError(format!("Failed to write to file {:?}: {}", file_path, e))
    })?;

    Ok(file_path)
}

/// Copies `source` to `dir/dest_name`, replacing any file already there.
pub fn copy_into(dir: &Path, source: &Path, dest_name: &str) -> Result<PathBuf, JournalError> {
    if dest_name.contains('/') || dest_name.contains('\\') || dest_name.starts_with('.') {
        return Err(JournalError::InvalidInput(format!(
            "Refusing to write file named {:?}",
            dest_name
        )));
    }

    ensure_dir(dir).map_err(|e| {
        JournalError::StorageError(format!("Failed to create directory {:?}: {}", dir, e))
    })?;

    let dest = dir.join(dest_name);
    fs::copy(source, &dest).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            JournalError::NotFound(format!("Source file {:?} not found", source))
        } else {
            JournalError::StorageError(format!(
                "Failed to copy {:?} to {:?}: {}",
                source, dest, e
            ))
        }
    })?;
    Ok(dest)
}
