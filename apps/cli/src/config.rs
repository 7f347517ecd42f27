//! CLI defaults file.
//!
//! An optional TOML file supplying login defaults so `vcsession login` can be
//! run without repeating the endpoint every time:
//!
//! ```toml
//! host = "vcenter.example.com"
//! port = 443
//! username = "administrator@vsphere.local"
//! log_level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Defaults read from the config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default vCenter host
    #[serde(default)]
    pub host: Option<String>,

    /// Default HTTPS port
    #[serde(default)]
    pub port: Option<u16>,

    /// Default login name
    #[serde(default)]
    pub username: Option<String>,

    /// Log level used when `--log-level` is not given
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum CliConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),
}

/// Result type for configuration operations.
pub type CliConfigResult<T> = std::result::Result<T, CliConfigError>;

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> CliConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content)
            .map_err(|e| CliConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// `~/.vcsession/config.toml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".vcsession").join("config.toml"))
    }

    /// Loads `explicit` if given, else the default file.
    ///
    /// A missing default file yields empty defaults. An explicit file that
    /// cannot be loaded, or a default file that exists but is broken, is
    /// reported as an error for the caller to warn about.
    pub fn discover(explicit: Option<&Path>) -> CliConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}
