//! appfs - application filesystem layer
//!
//! File handles, content buffers and streams resolved against configurable
//! resources, application-data and temp base directories.

pub mod cli;
pub mod config;
pub mod files;

pub use config::{ConfigError, FilesystemConfig};
pub use files::{
    BaseDirectory, Blob, FileError, FileHandle, FileInfo, FileMode, FileResult, FileStream,
    Filesystem, PathResolver, WriteSource,
};
