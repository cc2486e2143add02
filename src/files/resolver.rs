//! Path composition against configured base directories

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use url::Url;

use crate::config::FilesystemConfig;

pub const RESOURCES_SCHEME: &str = "app://";
pub const APPLICATION_DATA_SCHEME: &str = "appdata://";
pub const TEMP_SCHEME: &str = "temp://";
pub const FILE_SCHEME: &str = "file://";

/// Well-known base directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseDirectory {
    Resources,
    ApplicationData,
    Temp,
}

impl std::str::FromStr for BaseDirectory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resources" => Ok(BaseDirectory::Resources),
            "application_data" | "appdata" => Ok(BaseDirectory::ApplicationData),
            "temp" => Ok(BaseDirectory::Temp),
            _ => Err(format!("Unknown base directory: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    resources: PathBuf,
    application_data: PathBuf,
    temp: PathBuf,
}

impl PathResolver {
    pub fn new(config: &FilesystemConfig) -> Self {
        Self {
            resources: config.resources_directory.clone(),
            application_data: config.application_data_directory.clone(),
            temp: config.temp_directory.clone(),
        }
    }

    pub fn base_directory(&self, base: BaseDirectory) -> &Path {
        match base {
            BaseDirectory::Resources => &self.resources,
            BaseDirectory::ApplicationData => &self.application_data,
            BaseDirectory::Temp => &self.temp,
        }
    }

    /// Join `segments` in order into one native path.
    ///
    /// The first segment may be an absolute path, a scheme token
    /// (`app://`, `appdata://`, `temp://`, `file://`) or a relative name.
    /// Later segments are always appended, even when they start with a
    /// separator. A relative result is anchored at the resources directory.
    /// `.` and `..` are left as-is.
    pub fn resolve<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = segments
            .into_iter()
            .filter(|segment| !segment.as_ref().is_empty());

        let mut path = match segments.next() {
            Some(first) => self.expand_first(first.as_ref()),
            None => return self.resources.clone(),
        };

        for segment in segments {
            let segment = segment.as_ref().trim_start_matches(['/', MAIN_SEPARATOR]);
            if !segment.is_empty() {
                path.push(segment);
            }
        }

        if path.is_relative() {
            self.resources.join(path)
        } else {
            path
        }
    }

    /// Resolve `segments` beneath an explicit base directory
    pub fn resolve_in<I, S>(&self, base: BaseDirectory, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = self.base_directory(base).to_path_buf();
        for segment in segments {
            let segment = segment.as_ref().trim_start_matches(['/', MAIN_SEPARATOR]);
            if !segment.is_empty() {
                path.push(segment);
            }
        }
        path
    }

    fn expand_first(&self, segment: &str) -> PathBuf {
        let schemes = [
            (RESOURCES_SCHEME, BaseDirectory::Resources),
            (APPLICATION_DATA_SCHEME, BaseDirectory::ApplicationData),
            (TEMP_SCHEME, BaseDirectory::Temp),
        ];

        for (scheme, base) in schemes {
            if let Some(rest) = segment.strip_prefix(scheme) {
                return self.resolve_in(base, [rest]);
            }
        }

        if segment.starts_with(FILE_SCHEME) {
            if let Some(path) = Url::parse(segment)
                .ok()
                .and_then(|url| url.to_file_path().ok())
            {
                return path;
            }
        }

        PathBuf::from(segment)
    }
}
