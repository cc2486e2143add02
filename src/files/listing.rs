//! Directory enumeration

use std::path::Path;
use tokio::fs;

use super::error::{FileError, FileResult};

/// Names of the direct children of `path`, files and subdirectories alike.
/// Order is whatever the OS returns.
pub async fn list_children(path: &Path) -> FileResult<Vec<String>> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| FileError::from_io(path, e))?;
    if !metadata.is_dir() {
        return Err(FileError::NotADirectory {
            path: path.display().to_string(),
        });
    }

    let mut entries = fs::read_dir(path)
        .await
        .map_err(|e| FileError::from_io(path, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FileError::from_io(path, e))?
    {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(names)
}

/// Whether `path` is a directory with no children
pub async fn is_empty_directory(path: &Path) -> FileResult<bool> {
    let mut entries = fs::read_dir(path)
        .await
        .map_err(|e| FileError::from_io(path, e))?;
    let first = entries
        .next_entry()
        .await
        .map_err(|e| FileError::from_io(path, e))?;
    Ok(first.is_none())
}
