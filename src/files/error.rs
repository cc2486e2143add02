use std::io;
use std::path::Path;
use thiserror::Error;

use super::stream::FileMode;

pub type FileResult<T> = Result<T, FileError>;

/// Errors that can occur during file handle and stream operations
#[derive(Error, Debug)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("File already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Directory not empty: {path}")]
    NotEmpty { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Is a directory: {path}")]
    IsADirectory { path: String },

    #[error("Stream is closed: {path}")]
    StreamClosed { path: String },

    #[error("Stream opened in {mode} mode cannot {operation}")]
    InvalidMode { mode: FileMode, operation: String },

    #[error("Invalid path: {path} - {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Classify an I/O error raised while operating on `path`
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            io::ErrorKind::NotFound => FileError::NotFound { path },
            io::ErrorKind::AlreadyExists => FileError::AlreadyExists { path },
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            io::ErrorKind::DirectoryNotEmpty => FileError::NotEmpty { path },
            io::ErrorKind::NotADirectory => FileError::NotADirectory { path },
            io::ErrorKind::IsADirectory => FileError::IsADirectory { path },
            _ => FileError::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FileError::NotFound { .. })
    }
}
