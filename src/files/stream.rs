//! Mode-bound file streams with explicit close

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

use super::blob::Blob;
use super::error::{FileError, FileResult};

/// Access mode of a stream. The numeric codes are stable: READ=0, WRITE=1, APPEND=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FileMode {
    Read = 0,
    Write = 1,
    Append = 2,
}

impl FileMode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FileMode::Read),
            1 => Some(FileMode::Write),
            2 => Some(FileMode::Append),
            _ => None,
        }
    }

    pub fn is_readable(self) -> bool {
        matches!(self, FileMode::Read)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, FileMode::Write | FileMode::Append)
    }
}

impl std::str::FromStr for FileMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code)
                .ok_or_else(|| format!("Invalid file mode code: {code}"));
        }
        match s.to_lowercase().as_str() {
            "read" | "r" => Ok(FileMode::Read),
            "write" | "w" => Ok(FileMode::Write),
            "append" | "a" => Ok(FileMode::Append),
            _ => Err(format!("Invalid file mode: {s}")),
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileMode::Read => "read",
            FileMode::Write => "write",
            FileMode::Append => "append",
        };
        f.write_str(name)
    }
}

/// An open file bound to one mode until `close` is called.
///
/// Dropping a stream that is still open releases the descriptor but logs a
/// warning: every stream is expected to be closed explicitly.
pub struct FileStream {
    path: PathBuf,
    mode: FileMode,
    file: Option<File>,
}

impl FileStream {
    /// Open `path` in `mode`. READ requires an existing regular file;
    /// WRITE truncates or creates; APPEND creates or positions at the end.
    pub async fn open(path: impl AsRef<Path>, mode: FileMode) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Ok(metadata) = fs::metadata(&path).await {
            if metadata.is_dir() {
                return Err(FileError::IsADirectory {
                    path: path.display().to_string(),
                });
            }
        }

        let mut options = OpenOptions::new();
        match mode {
            FileMode::Read => options.read(true),
            FileMode::Write => options.write(true).create(true).truncate(true),
            FileMode::Append => options.append(true).create(true),
        };

        let file = options
            .open(&path)
            .await
            .map_err(|e| FileError::from_io(&path, e))?;

        debug!(path = %path.display(), %mode, "opened file stream");

        Ok(Self {
            path,
            mode,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn is_readable(&self) -> bool {
        self.is_open() && self.mode.is_readable()
    }

    pub fn is_writable(&self) -> bool {
        self.is_open() && self.mode.is_writable()
    }

    /// Read up to `buf.len()` bytes; returns 0 at end of file
    pub async fn read(&mut self, buf: &mut [u8]) -> FileResult<usize> {
        let path = self.path.clone();
        let file = self.file_for("read", FileMode::is_readable)?;
        file.read(buf).await.map_err(|e| FileError::from_io(&path, e))
    }

    /// Read everything from the current position to the end of the file
    pub async fn read_to_end(&mut self) -> FileResult<Blob> {
        let path = self.path.clone();
        let file = self.file_for("read", FileMode::is_readable)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .await
            .map_err(|e| FileError::from_io(&path, e))?;
        Ok(Blob::new(bytes))
    }

    /// Write all of `data`, returning the number of bytes written
    pub async fn write(&mut self, data: &[u8]) -> FileResult<usize> {
        let path = self.path.clone();
        let file = self.file_for("write", FileMode::is_writable)?;
        file.write_all(data)
            .await
            .map_err(|e| FileError::from_io(&path, e))?;
        Ok(data.len())
    }

    pub async fn flush(&mut self) -> FileResult<()> {
        let path = self.path.clone();
        let file = self.file_for("flush", FileMode::is_writable)?;
        file.flush().await.map_err(|e| FileError::from_io(&path, e))
    }

    /// Release the descriptor. Closing twice is an error.
    pub async fn close(&mut self) -> FileResult<()> {
        let mut file = self.file.take().ok_or_else(|| FileError::StreamClosed {
            path: self.path.display().to_string(),
        })?;

        if self.mode.is_writable() {
            file.flush()
                .await
                .map_err(|e| FileError::from_io(&self.path, e))?;
        }

        debug!(path = %self.path.display(), mode = %self.mode, "closed file stream");
        Ok(())
    }

    fn file_for(&mut self, operation: &str, allowed: fn(FileMode) -> bool) -> FileResult<&mut File> {
        if !allowed(self.mode) {
            return Err(FileError::InvalidMode {
                mode: self.mode,
                operation: operation.to_string(),
            });
        }

        self.file.as_mut().ok_or_else(|| FileError::StreamClosed {
            path: self.path.display().to_string(),
        })
    }
}

impl fmt::Debug for FileStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStream")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("is_open", &self.is_open())
            .finish()
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        if self.file.is_some() {
            warn!(path = %self.path.display(), mode = %self.mode, "file stream dropped without close");
        }
    }
}
