//! Unix-specific file metadata

use nix::errno::Errno;
use nix::sys::statvfs::statvfs;
use nix::unistd::{access, AccessFlags};
use std::fs::Metadata;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::files::error::{FileError, FileResult};

/// Dotfiles are hidden on Unix
pub fn is_hidden(path: &Path, _metadata: &Metadata) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Regular file with any execute bit set
pub fn is_executable(_path: &Path, metadata: &Metadata) -> bool {
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

/// Whether the current process may write to `path`
pub fn is_writable(path: &Path) -> bool {
    access(path, AccessFlags::W_OK).is_ok()
}

/// Bytes available to unprivileged users on the volume holding `path`
#[allow(clippy::unnecessary_cast)]
pub fn space_available(path: &Path) -> FileResult<u64> {
    let stat = statvfs(path).map_err(|e| FileError::from_io(path, io::Error::from(e)))?;
    Ok(stat.blocks_available() as u64 * stat.fragment_size() as u64)
}

/// Rename failed because source and destination live on different volumes
pub fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(Errno::EXDEV as i32)
}
