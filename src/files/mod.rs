//! File abstraction layer
//!
//! - Path resolution against resources / application-data / temp base directories
//! - File handles with existence checks, create/delete, read/write/append, copy/move
//! - Owned content buffers and mode-bound streams
//! - Directory listings and per-platform metadata

pub mod blob;
pub mod error;
pub mod filesystem;
pub mod handle;
pub mod listing;
pub mod resolver;
pub mod stream;

// Utility modules
pub mod platform;
pub mod utils;

pub use blob::Blob;
pub use error::{FileError, FileResult};
pub use filesystem::Filesystem;
pub use handle::{FileHandle, FileInfo, WriteSource};
pub use resolver::{BaseDirectory, PathResolver};
pub use stream::{FileMode, FileStream};
