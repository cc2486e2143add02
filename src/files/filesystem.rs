//! Entry point that hands out file handles for configured base directories

use std::path::{Path, MAIN_SEPARATOR};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::FilesystemConfig;

use super::error::{FileError, FileResult};
use super::handle::FileHandle;
use super::resolver::{BaseDirectory, PathResolver};
use super::stream::{FileMode, FileStream};

#[derive(Debug, Clone)]
pub struct Filesystem {
    config: FilesystemConfig,
    resolver: PathResolver,
}

impl Default for Filesystem {
    fn default() -> Self {
        Self::new(FilesystemConfig::default())
    }
}

impl Filesystem {
    pub const SEPARATOR: char = MAIN_SEPARATOR;
    pub const MODE_READ: FileMode = FileMode::Read;
    pub const MODE_WRITE: FileMode = FileMode::Write;
    pub const MODE_APPEND: FileMode = FileMode::Append;

    pub fn new(config: FilesystemConfig) -> Self {
        let resolver = PathResolver::new(&config);
        Self { config, resolver }
    }

    pub fn config(&self) -> &FilesystemConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Handle for the path built from `segments`; see [`PathResolver::resolve`]
    pub fn get_file<I, S>(&self, segments: I) -> FileHandle
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FileHandle::new(self.resolver.resolve(segments))
    }

    pub fn get_file_in<I, S>(&self, base: BaseDirectory, segments: I) -> FileHandle
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FileHandle::new(self.resolver.resolve_in(base, segments))
    }

    pub fn resources_directory(&self) -> String {
        self.base_string(BaseDirectory::Resources)
    }

    pub fn application_data_directory(&self) -> String {
        self.base_string(BaseDirectory::ApplicationData)
    }

    pub fn temp_directory(&self) -> String {
        self.base_string(BaseDirectory::Temp)
    }

    pub fn separator() -> char {
        Self::SEPARATOR
    }

    /// Create the writable base directories if they are missing.
    /// The resources directory is bundled content and is left alone.
    pub async fn ensure_directories(&self) -> FileResult<()> {
        for dir in [
            &self.config.application_data_directory,
            &self.config.temp_directory,
        ] {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| FileError::from_io(dir, e))?;
        }
        info!(
            application_data = %self.config.application_data_directory.display(),
            temp = %self.config.temp_directory.display(),
            "base directories ready"
        );
        Ok(())
    }

    /// Open a stream on the path built from `segments`
    pub async fn open_stream<I, S>(&self, mode: FileMode, segments: I) -> FileResult<FileStream>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.get_file(segments).open(mode).await
    }

    /// New empty file with a unique name in the temp directory
    pub async fn create_temp_file(&self) -> FileResult<FileHandle> {
        let handle = self.unique_temp_handle().await?;
        handle.try_create_file().await?;
        debug!(path = %handle, "created temp file");
        Ok(handle)
    }

    /// New empty directory with a unique name in the temp directory
    pub async fn create_temp_directory(&self) -> FileResult<FileHandle> {
        let handle = self.unique_temp_handle().await?;
        handle.try_create_directory().await?;
        debug!(path = %handle, "created temp directory");
        Ok(handle)
    }

    async fn unique_temp_handle(&self) -> FileResult<FileHandle> {
        let temp = &self.config.temp_directory;
        fs::create_dir_all(temp)
            .await
            .map_err(|e| FileError::from_io(temp, e))?;
        let name = format!("tmp{}", Uuid::new_v4().simple());
        Ok(FileHandle::new(temp.join(name)))
    }

    fn base_string(&self, base: BaseDirectory) -> String {
        path_string(self.resolver.base_directory(base))
    }
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}
