//! Sandboxed filesystem for tests

use appfs::{FilesystemConfig, Filesystem};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

use super::APP_JS;

/// Temporary sandbox with `Resources/app.js` and an empty `Data/`
pub struct TestEnvironment {
    temp_dir: TempDir,
    fs: Filesystem,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let config = FilesystemConfig::rooted_at(temp_dir.path());

        std::fs::create_dir_all(&config.resources_directory)
            .expect("Failed to create resources directory");
        std::fs::write(config.resources_directory.join("app.js"), APP_JS)
            .expect("Failed to seed app.js");

        let fs = Filesystem::new(config);
        fs.ensure_directories()
            .await
            .expect("Failed to create base directories");

        Self { temp_dir, fs }
    }

    pub fn fs(&self) -> &Filesystem {
        &self.fs
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn resources_path(&self, relative_path: &str) -> PathBuf {
        self.fs.config().resources_directory.join(relative_path)
    }

    pub fn data_path(&self, relative_path: &str) -> PathBuf {
        self.fs.config().application_data_directory.join(relative_path)
    }

    /// Create a file in the application data directory
    pub fn create_data_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let file_path = self.data_path(relative_path);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        std::fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }
}
