//! Atomic file replacement for writes and copies

use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::files::error::{FileError, FileResult};

/// Writes into a sibling temp file and renames it over the target on commit.
/// The target is never observed half-written. When the target is a symlink
/// the linked file is replaced and the link itself is left in place.
pub struct AtomicWriter {
    temp_path: PathBuf,
    final_path: PathBuf,
    temp_file: Option<File>,
    committed: bool,
}

impl AtomicWriter {
    /// Create a new atomic writer for the target path
    pub async fn new(target_path: impl AsRef<Path>) -> FileResult<Self> {
        let final_path = write_target(target_path.as_ref()).await;
        let temp_path = create_temp_file_path(&final_path)?;

        let temp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .await
            .map_err(|e| FileError::from_io(&final_path, e))?;

        Ok(AtomicWriter {
            temp_path,
            final_path,
            temp_file: Some(temp_file),
            committed: false,
        })
    }

    /// Write data to the temporary file
    pub async fn write_all(&mut self, data: &[u8]) -> FileResult<()> {
        if let Some(file) = self.temp_file.as_mut() {
            file.write_all(data)
                .await
                .map_err(|e| FileError::from_io(&self.temp_path, e))?;
        }
        Ok(())
    }

    /// Flush the temp file and move it over the target.
    /// Permissions of an existing target carry over to the replacement.
    pub async fn commit(mut self) -> FileResult<()> {
        if let Some(mut file) = self.temp_file.take() {
            file.flush()
                .await
                .map_err(|e| FileError::from_io(&self.temp_path, e))?;
            file.sync_all()
                .await
                .map_err(|e| FileError::from_io(&self.temp_path, e))?;
        }

        if let Ok(metadata) = fs::metadata(&self.final_path).await {
            fs::set_permissions(&self.temp_path, metadata.permissions())
                .await
                .map_err(|e| FileError::from_io(&self.temp_path, e))?;
        }

        fs::rename(&self.temp_path, &self.final_path)
            .await
            .map_err(|e| FileError::from_io(&self.final_path, e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        if !self.committed {
            self.temp_file.take();
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}

/// Where a write to `path` must land. A symlink resolves to the file it
/// points at, so the rename replaces that file instead of the link. A
/// dangling link resolves to its recorded target.
async fn write_target(path: &Path) -> PathBuf {
    let is_symlink = fs::symlink_metadata(path)
        .await
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if !is_symlink {
        return path.to_path_buf();
    }

    if let Ok(real) = fs::canonicalize(path).await {
        return real;
    }
    match fs::read_link(path).await {
        Ok(link) => path
            .parent()
            .map(|parent| parent.join(&link))
            .unwrap_or(link),
        Err(_) => path.to_path_buf(),
    }
}

/// Generate a unique temporary file path in the same directory as the target
fn create_temp_file_path(target_path: &Path) -> FileResult<PathBuf> {
    let parent = target_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = target_path
        .file_name()
        .ok_or_else(|| FileError::InvalidPath {
            path: target_path.display().to_string(),
            reason: "path has no file name".to_string(),
        })?
        .to_string_lossy();

    let temp_name = format!(".{}.tmp.{}", file_name, Uuid::new_v4().simple());
    Ok(parent.join(temp_name))
}

/// Replace the contents of `dest` with `data` in one step
pub async fn atomic_write(dest: &Path, data: &[u8]) -> FileResult<()> {
    let mut writer = AtomicWriter::new(dest).await?;
    writer.write_all(data).await?;
    writer.commit().await
}

/// Copy a file atomically from source to destination
pub async fn atomic_copy(src: &Path, dest: &Path) -> FileResult<()> {
    let content = fs::read(src).await.map_err(|e| FileError::from_io(src, e))?;
    atomic_write(dest, &content).await
}
