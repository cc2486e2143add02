//! File handle: a path plus operations that re-stat on every call

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::SystemTime;
use tokio::fs;
use tracing::debug;
use url::Url;
use walkdir::WalkDir;

use super::blob::Blob;
use super::error::{FileError, FileResult};
use super::listing::{is_empty_directory, list_children};
use super::platform;
use super::stream::{FileMode, FileStream};
use super::utils::atomic::{atomic_copy, atomic_write};

/// Content accepted by `write` and `append`
#[derive(Debug, Clone)]
pub enum WriteSource<'a> {
    Text(Cow<'a, str>),
    /// Current contents of another file, read at write time
    File(&'a FileHandle),
    Blob(Cow<'a, Blob>),
}

impl WriteSource<'_> {
    async fn into_bytes(self) -> FileResult<Vec<u8>> {
        match self {
            WriteSource::Text(text) => Ok(text.into_owned().into_bytes()),
            WriteSource::File(handle) => Ok(handle.read().await?.into_bytes()),
            WriteSource::Blob(blob) => Ok(blob.into_owned().into_bytes()),
        }
    }
}

impl<'a> From<&'a str> for WriteSource<'a> {
    fn from(text: &'a str) -> Self {
        WriteSource::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for WriteSource<'a> {
    fn from(text: &'a String) -> Self {
        WriteSource::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for WriteSource<'_> {
    fn from(text: String) -> Self {
        WriteSource::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a FileHandle> for WriteSource<'a> {
    fn from(handle: &'a FileHandle) -> Self {
        WriteSource::File(handle)
    }
}

impl<'a> From<&'a Blob> for WriteSource<'a> {
    fn from(blob: &'a Blob) -> Self {
        WriteSource::Blob(Cow::Borrowed(blob))
    }
}

impl From<Blob> for WriteSource<'_> {
    fn from(blob: Blob) -> Self {
        WriteSource::Blob(Cow::Owned(blob))
    }
}

/// Snapshot of everything the handle's metadata accessors report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub name: String,
    pub exists: bool,
    pub is_file: bool,
    pub is_directory: bool,
    pub symbolic_link: bool,
    pub size: u64,
    pub readonly: bool,
    pub writable: bool,
    pub executable: bool,
    pub hidden: bool,
    pub create_timestamp: i64,
    pub modification_timestamp: i64,
}

/// A reference to a path that may or may not exist.
///
/// The path never changes after construction: `copy`, `move_to` and
/// `rename` act on the filesystem and leave the handle pointing where it
/// was. Every query stats the filesystem again, so two calls in a row can
/// disagree if something changed in between.
///
/// Mutators return `bool` and log the reason for a `false` at debug level;
/// the `try_` variants return the underlying [`FileError`]. `read` and
/// `open` always return `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Existence and type

    pub async fn exists(&self) -> bool {
        self.metadata().await.is_some()
    }

    pub async fn is_file(&self) -> bool {
        self.metadata().await.map(|m| m.is_file()).unwrap_or(false)
    }

    pub async fn is_directory(&self) -> bool {
        self.metadata().await.map(|m| m.is_dir()).unwrap_or(false)
    }

    // Creation and deletion

    /// Create an empty file. Fails if the entry exists or the parent is missing.
    pub async fn try_create_file(&self) -> FileResult<()> {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
            .map(|_| ())
            .map_err(|e| self.io_error(e))
    }

    pub async fn create_file(&self) -> bool {
        self.report("create_file", self.try_create_file().await)
    }

    /// Create the directory and any missing ancestors
    pub async fn try_create_directory(&self) -> FileResult<()> {
        if fs::symlink_metadata(&self.path).await.is_ok() {
            return Err(FileError::AlreadyExists {
                path: self.path.display().to_string(),
            });
        }
        fs::create_dir_all(&self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    pub async fn create_directory(&self) -> bool {
        self.report("create_directory", self.try_create_directory().await)
    }

    pub async fn try_delete_file(&self) -> FileResult<()> {
        let metadata = fs::symlink_metadata(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        if metadata.is_dir() {
            return Err(FileError::IsADirectory {
                path: self.path.display().to_string(),
            });
        }
        fs::remove_file(&self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    pub async fn delete_file(&self) -> bool {
        self.report("delete_file", self.try_delete_file().await)
    }

    /// Remove the directory. Without `recursive` it must be empty;
    /// with it, all descendants go first.
    pub async fn try_delete_directory(&self, recursive: bool) -> FileResult<()> {
        let metadata = fs::symlink_metadata(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        if !metadata.is_dir() {
            return Err(FileError::NotADirectory {
                path: self.path.display().to_string(),
            });
        }

        let result = if recursive {
            fs::remove_dir_all(&self.path).await
        } else {
            if !is_empty_directory(&self.path).await? {
                return Err(FileError::NotEmpty {
                    path: self.path.display().to_string(),
                });
            }
            fs::remove_dir(&self.path).await
        };
        result.map_err(|e| self.io_error(e))
    }

    pub async fn delete_directory(&self, recursive: bool) -> bool {
        self.report(
            "delete_directory",
            self.try_delete_directory(recursive).await,
        )
    }

    // Content

    /// Full contents as an owned buffer
    pub async fn read(&self) -> FileResult<Blob> {
        if self.metadata().await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(FileError::IsADirectory {
                path: self.path.display().to_string(),
            });
        }
        let bytes = fs::read(&self.path).await.map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), size = bytes.len(), "read file");
        Ok(Blob::new(bytes))
    }

    /// Replace (or with `append`, extend) the file's contents.
    ///
    /// The new contents are staged in a sibling temp file and renamed into
    /// place, so the target is either fully updated or left as it was.
    /// Appending to a missing file creates it.
    pub async fn try_write<'a>(
        &self,
        content: impl Into<WriteSource<'a>>,
        append: bool,
    ) -> FileResult<()> {
        let source: WriteSource<'a> = content.into();
        let data = source.into_bytes().await?;

        if let Some(metadata) = self.metadata().await {
            if metadata.is_dir() {
                return Err(FileError::IsADirectory {
                    path: self.path.display().to_string(),
                });
            }
            if metadata.permissions().readonly() {
                return Err(FileError::PermissionDenied {
                    path: self.path.display().to_string(),
                });
            }
        }

        let data = if append {
            match fs::read(&self.path).await {
                Ok(mut existing) => {
                    existing.extend_from_slice(&data);
                    existing
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => data,
                Err(e) => return Err(self.io_error(e)),
            }
        } else {
            data
        };

        atomic_write(&self.path, &data).await
    }

    pub async fn write<'a>(&self, content: impl Into<WriteSource<'a>>, append: bool) -> bool {
        self.report("write", self.try_write(content, append).await)
    }

    pub async fn append<'a>(&self, content: impl Into<WriteSource<'a>>) -> bool {
        self.report("append", self.try_write(content, true).await)
    }

    // Relocation

    /// Duplicate this entry at `destination`. Files replace an existing
    /// destination file; directories are copied recursively.
    pub async fn try_copy(&self, destination: impl AsRef<Path>) -> FileResult<()> {
        let destination = destination.as_ref();
        let metadata = fs::metadata(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        if metadata.is_dir() {
            let source = absolute(&self.path);
            if absolute(destination).starts_with(&source) {
                return Err(FileError::InvalidPath {
                    path: destination.display().to_string(),
                    reason: "cannot copy a directory into itself".to_string(),
                });
            }

            let existed = fs::metadata(destination).await.is_ok();
            let result = copy_directory(&self.path, destination).await;
            if result.is_err() && !existed {
                let _ = fs::remove_dir_all(destination).await;
            }
            return result;
        }

        if is_dir(destination).await {
            return Err(FileError::IsADirectory {
                path: destination.display().to_string(),
            });
        }
        atomic_copy(&self.path, destination).await
    }

    pub async fn copy(&self, destination: impl AsRef<Path>) -> bool {
        self.report("copy", self.try_copy(destination).await)
    }

    /// Relocate this entry. Falls back to copy-then-delete across volumes.
    pub async fn try_move_to(&self, destination: impl AsRef<Path>) -> FileResult<()> {
        let destination = destination.as_ref();
        let metadata = fs::symlink_metadata(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        if let Ok(existing) = fs::metadata(destination).await {
            if existing.is_dir() || metadata.is_dir() {
                return Err(FileError::AlreadyExists {
                    path: destination.display().to_string(),
                });
            }
        }

        match fs::rename(&self.path, destination).await {
            Ok(()) => Ok(()),
            Err(e) if platform::is_cross_device(&e) => {
                debug!(
                    from = %self.path.display(),
                    to = %destination.display(),
                    "rename crosses volumes, copying instead"
                );
                self.try_copy(destination).await?;
                let removed = if metadata.is_dir() {
                    fs::remove_dir_all(&self.path).await
                } else {
                    fs::remove_file(&self.path).await
                };
                removed.map_err(|e| self.io_error(e))
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    pub async fn move_to(&self, destination: impl AsRef<Path>) -> bool {
        self.report("move", self.try_move_to(destination).await)
    }

    /// Rename within the same directory. `new_name` must be a bare name.
    pub async fn try_rename(&self, new_name: &str) -> FileResult<()> {
        if new_name.is_empty() || new_name.contains(['/', MAIN_SEPARATOR]) {
            return Err(FileError::InvalidPath {
                path: new_name.to_string(),
                reason: "new name must not contain a separator".to_string(),
            });
        }
        if self.path.file_name().is_none() {
            return Err(FileError::InvalidPath {
                path: self.path.display().to_string(),
                reason: "path has no file name".to_string(),
            });
        }

        let destination = self.path.with_file_name(new_name);
        if fs::symlink_metadata(&destination).await.is_ok() {
            return Err(FileError::AlreadyExists {
                path: destination.display().to_string(),
            });
        }
        self.try_move_to(&destination).await
    }

    pub async fn rename(&self, new_name: &str) -> bool {
        self.report("rename", self.try_rename(new_name).await)
    }

    // Streams and listings

    /// Open a stream on this path. The caller must `close` it.
    pub async fn open(&self, mode: FileMode) -> FileResult<FileStream> {
        FileStream::open(&self.path, mode).await
    }

    pub async fn try_directory_listing(&self) -> FileResult<Vec<String>> {
        list_children(&self.path).await
    }

    /// Names of direct children; empty when the path is missing or not a directory
    pub async fn directory_listing(&self) -> Vec<String> {
        match self.try_directory_listing().await {
            Ok(names) => names,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "directory listing unavailable");
                Vec::new()
            }
        }
    }

    /// Free bytes on the volume holding this path, or its nearest existing
    /// ancestor. 0 when the volume cannot be queried.
    pub async fn space_available(&self) -> u64 {
        let absolute = absolute(&self.path);
        let mut probe = None;
        for ancestor in absolute.ancestors() {
            if fs::metadata(ancestor).await.is_ok() {
                probe = Some(ancestor.to_path_buf());
                break;
            }
        }

        let Some(probe) = probe else {
            return 0;
        };
        platform::space_available(&probe).unwrap_or_else(|e| {
            debug!(path = %probe.display(), error = %e, "free space query failed");
            0
        })
    }

    // Metadata

    /// Milliseconds since the epoch; 0 where the platform records no creation time
    pub async fn create_timestamp(&self) -> i64 {
        self.metadata()
            .await
            .and_then(|m| m.created().ok())
            .map(epoch_millis)
            .unwrap_or(0)
    }

    pub async fn modification_timestamp(&self) -> i64 {
        self.metadata()
            .await
            .and_then(|m| m.modified().ok())
            .map(epoch_millis)
            .unwrap_or(0)
    }

    pub async fn executable(&self) -> bool {
        self.metadata()
            .await
            .map(|m| platform::is_executable(&self.path, &m))
            .unwrap_or(false)
    }

    pub async fn hidden(&self) -> bool {
        self.metadata()
            .await
            .map(|m| platform::is_hidden(&self.path, &m))
            .unwrap_or(false)
    }

    pub async fn readonly(&self) -> bool {
        self.metadata()
            .await
            .map(|m| m.permissions().readonly())
            .unwrap_or(false)
    }

    /// For a missing path, whether it could be created in its parent
    pub async fn writable(&self) -> bool {
        if self.metadata().await.is_some() {
            return platform::is_writable(&self.path);
        }
        match self.path.parent() {
            Some(parent) if is_dir(parent).await => platform::is_writable(parent),
            _ => false,
        }
    }

    pub async fn symbolic_link(&self) -> bool {
        fs::symlink_metadata(&self.path)
            .await
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    pub async fn size(&self) -> u64 {
        self.metadata().await.map(|m| m.len()).unwrap_or(0)
    }

    /// Every metadata accessor gathered into one value. The entry is
    /// queried a few times, so a concurrent change can show up partially.
    pub async fn stat(&self) -> FileInfo {
        let metadata = self.metadata().await;
        let symbolic_link = self.symbolic_link().await;
        let writable = self.writable().await;

        match metadata {
            Some(m) => FileInfo {
                path: self.native_path(),
                name: self.name(),
                exists: true,
                is_file: m.is_file(),
                is_directory: m.is_dir(),
                symbolic_link,
                size: m.len(),
                readonly: m.permissions().readonly(),
                writable,
                executable: platform::is_executable(&self.path, &m),
                hidden: platform::is_hidden(&self.path, &m),
                create_timestamp: m.created().map(epoch_millis).unwrap_or(0),
                modification_timestamp: m.modified().map(epoch_millis).unwrap_or(0),
            },
            None => FileInfo {
                path: self.native_path(),
                name: self.name(),
                exists: false,
                is_file: false,
                is_directory: false,
                symbolic_link,
                size: 0,
                readonly: false,
                writable,
                executable: false,
                hidden: false,
                create_timestamp: 0,
                modification_timestamp: 0,
            },
        }
    }

    // Path-derived properties

    /// Last path component, or the whole path when there is none
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.native_path())
    }

    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
    }

    pub fn native_path(&self) -> String {
        self.path.display().to_string()
    }

    pub fn parent(&self) -> Option<FileHandle> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(FileHandle::new)
    }

    /// Absolute form of the path, without resolving symlinks
    pub fn resolve(&self) -> String {
        absolute(&self.path).display().to_string()
    }

    pub fn url(&self) -> Option<Url> {
        Url::from_file_path(absolute(&self.path)).ok()
    }

    async fn metadata(&self) -> Option<Metadata> {
        fs::metadata(&self.path).await.ok()
    }

    fn io_error(&self, err: std::io::Error) -> FileError {
        FileError::from_io(&self.path, err)
    }

    fn report(&self, operation: &'static str, result: FileResult<()>) -> bool {
        match result {
            Ok(()) => {
                debug!(path = %self.path.display(), operation, "file operation succeeded");
                true
            }
            Err(e) => {
                debug!(path = %self.path.display(), operation, error = %e, "file operation failed");
                false
            }
        }
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn epoch_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// Recreate the tree under `source` at `destination`. Symlinks are followed,
/// so linked files and directories are copied as regular entries.
async fn copy_directory(source: &Path, destination: &Path) -> FileResult<()> {
    let entries = WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| walk_error(source, e))?;

    for entry in entries {
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| FileError::InvalidPath {
                path: entry.path().display().to_string(),
                reason: "entry is outside the copied directory".to_string(),
            })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .await
                .map_err(|e| FileError::from_io(&target, e))?;
        } else {
            atomic_copy(entry.path(), &target).await?;
        }
    }
    Ok(())
}

fn walk_error(root: &Path, err: walkdir::Error) -> FileError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(io) => FileError::from_io(&path, io),
        None => FileError::InvalidPath {
            path: path.display().to_string(),
            reason: "filesystem loop".to_string(),
        },
    }
}
