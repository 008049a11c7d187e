//! Optional TOML configuration with defaults for the removal options.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;
use crate::stripper::{DEFAULT_SUFFIX, StripOptions};

const CONFIG_DIR: &str = "metaclean";
const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Appended to the file stem of sibling copies.
    pub suffix: String,
    /// Reattach the source EXIF block when re-encoding images.
    pub keep_exif: bool,
    /// Descend into subdirectories when scanning.
    pub recursive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            keep_exif: false,
            recursive: true,
        }
    }
}

impl Config {
    /// Loads `explicit` when given (it must exist), otherwise the per-user
    /// config file if there is one, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn strip_options(&self, verbose: bool) -> StripOptions {
        StripOptions {
            suffix: self.suffix.clone(),
            keep_exif: self.keep_exif,
            verbose,
        }
    }
}

/// `metaclean/config.toml` under the platform config directory
/// (`$XDG_CONFIG_HOME` on Linux, `Application Support` on macOS, `%APPDATA%`
/// on Windows).
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
