//! Store location configuration.
//!
//! # Invariants
//! - The store directory is always absolute.
//! - Store names are plain file stems: ASCII letters, digits, `_` and `-`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Directory created under the platform data directory.
pub const APP_DIR_NAME: &str = "movieshelf";
/// Store file stem used when none is configured.
pub const DEFAULT_STORE_NAME: &str = "MovieAppModel";
const STORE_FILE_EXTENSION: &str = "sqlite3";

static STORE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$").expect("valid store name regex"));

/// Where the store file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    directory: PathBuf,
    store_name: String,
}

impl StoreConfig {
    /// Builds a config for `store_name` inside `directory`.
    ///
    /// # Errors
    /// - `RelativeDirectory` when `directory` is not absolute.
    /// - `InvalidStoreName` when `store_name` is not a plain file stem.
    pub fn new(
        directory: impl Into<PathBuf>,
        store_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let directory = directory.into();
        if !directory.is_absolute() {
            return Err(ConfigError::RelativeDirectory(directory));
        }

        let store_name = store_name.into().trim().to_string();
        if !STORE_NAME_PATTERN.is_match(&store_name) {
            return Err(ConfigError::InvalidStoreName(store_name));
        }

        Ok(Self {
            directory,
            store_name,
        })
    }

    /// Default store name inside `directory`.
    pub fn in_directory(directory: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::new(directory, DEFAULT_STORE_NAME)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Full path of the store file.
    pub fn store_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{STORE_FILE_EXTENSION}", self.store_name))
    }
}

impl Default for StoreConfig {
    /// `<platform data dir>/movieshelf/MovieAppModel.sqlite3`, falling back to
    /// the temp directory on platforms without a data directory.
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            directory: base.join(APP_DIR_NAME),
            store_name: DEFAULT_STORE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeDirectory(PathBuf),
    InvalidStoreName(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDirectory(path) => write!(
                f,
                "store directory must be an absolute path, got `{}`",
                path.display()
            ),
            Self::InvalidStoreName(name) => write!(
                f,
                "invalid store name `{name}`; expected letters, digits, `_` or `-`"
            ),
        }
    }
}

impl Error for ConfigError {}
