//! Windows-specific file metadata

use std::ffi::OsStr;
use std::fs::Metadata;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::fs::MetadataExt;
use std::path::Path;
use winapi::shared::ntdef::ULARGE_INTEGER;
use winapi::shared::winerror::ERROR_NOT_SAME_DEVICE;
use winapi::um::fileapi::GetDiskFreeSpaceExW;
use winapi::um::winnt::FILE_ATTRIBUTE_HIDDEN;

use crate::files::error::{FileError, FileResult};

const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "bat", "cmd", "com"];

fn to_wide(path: &Path) -> Vec<u16> {
    OsStr::new(path)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

pub fn is_hidden(_path: &Path, metadata: &Metadata) -> bool {
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

/// Windows has no execute bit; judge by extension
pub fn is_executable(path: &Path, metadata: &Metadata) -> bool {
    metadata.is_file()
        && path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                EXECUTABLE_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
}

pub fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|metadata| !metadata.permissions().readonly())
        .unwrap_or(false)
}

pub fn space_available(path: &Path) -> FileResult<u64> {
    let wide_path = to_wide(path);
    let mut available: ULARGE_INTEGER = unsafe { std::mem::zeroed() };

    let ok = unsafe {
        GetDiskFreeSpaceExW(
            wide_path.as_ptr(),
            &mut available,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    };
    if ok == 0 {
        return Err(FileError::from_io(path, io::Error::last_os_error()));
    }

    Ok(unsafe { *available.QuadPart() })
}

pub fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(ERROR_NOT_SAME_DEVICE as i32)
}
