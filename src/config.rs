//! Base directory configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const APP_DIR_NAME: &str = "appfs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Directories that relative names and scheme tokens resolve against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesystemConfig {
    /// Bundled, read-mostly content. Relative paths resolve here.
    pub resources_directory: PathBuf,
    /// Writable private storage
    pub application_data_directory: PathBuf,
    pub temp_directory: PathBuf,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            resources_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            application_data_directory: dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME),
            temp_directory: std::env::temp_dir().join(APP_DIR_NAME),
        }
    }
}

impl FilesystemConfig {
    /// Lay out all base directories under one root: `Resources/`, `Data/`, `tmp/`
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            resources_directory: root.join("Resources"),
            application_data_directory: root.join("Data"),
            temp_directory: root.join("tmp"),
        }
    }

    pub fn with_resources_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.resources_directory = path.into();
        self
    }

    pub fn with_application_data_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.application_data_directory = path.into();
        self
    }

    pub fn with_temp_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_directory = path.into();
        self
    }

    /// Load from a YAML file, or JSON when the extension is `.json`.
    /// Missing keys fall back to defaults.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }
}
