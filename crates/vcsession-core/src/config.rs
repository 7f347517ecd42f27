//! Session store configuration.
//!
//! Everything the store needs from the environment is captured once into a
//! [`SessionStoreConfig`] at process start and passed down explicitly.
//!
//! Session file path precedence:
//! 1. Explicit path (constructor argument / `--session-file`)
//! 2. `VMWARE_SESSION_FILE`
//! 3. `~/.vmware/vcenter_session.json`

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use zeroize::Zeroizing;

/// Environment variable redirecting the session file location.
pub const ENV_SESSION_FILE: &str = "VMWARE_SESSION_FILE";

/// Environment variable holding a base64-encoded 32-byte encryption key.
pub const ENV_SESSION_KEY: &str = "VMWARE_SESSION_KEY";

/// Environment variable holding the passphrase for key derivation.
pub const ENV_SESSION_PASSPHRASE: &str = "VMWARE_SESSION_PASSPHRASE";

/// Directory under the home directory holding the default session file.
pub const DEFAULT_SESSION_DIR: &str = ".vmware";

/// File name of the default session file.
pub const DEFAULT_SESSION_FILE: &str = "vcenter_session.json";

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No explicit path was given and the home directory is unknown.
    #[error("Cannot determine session file location: home directory not found")]
    NoHomeDirectory,
}

/// Configuration for the session store and key resolver.
#[derive(Clone, Default)]
pub struct SessionStoreConfig {
    /// Explicit session file path; wins over everything else.
    pub session_file: Option<PathBuf>,
    /// Path from the environment override.
    pub session_file_override: Option<PathBuf>,
    /// Explicit encryption key, base64-encoded.
    pub encryption_key: Option<Zeroizing<String>>,
    /// Passphrase for PBKDF2 key derivation.
    pub passphrase: Option<Zeroizing<String>>,
}

impl SessionStoreConfig {
    /// Creates an empty configuration (default path, no key material).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the recognized environment variables once.
    // Allow env::var for session configuration discovery
    #[allow(clippy::disallowed_methods)]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            session_file: None,
            session_file_override: get(ENV_SESSION_FILE).map(PathBuf::from),
            encryption_key: get(ENV_SESSION_KEY).map(Zeroizing::new),
            passphrase: get(ENV_SESSION_PASSPHRASE).map(Zeroizing::new),
        }
    }

    /// Sets the explicit session file path.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Sets the explicit encryption key (base64).
    #[must_use]
    pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(Zeroizing::new(key.into()));
        self
    }

    /// Sets the key derivation passphrase.
    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    /// Resolves the session file path using the documented precedence.
    pub fn resolve_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.session_file {
            return Ok(path.clone());
        }
        if let Some(ref path) = self.session_file_override {
            return Ok(path.clone());
        }
        Self::default_session_path()
    }

    /// Returns `~/.vmware/vcenter_session.json`.
    pub fn default_session_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_SESSION_DIR).join(DEFAULT_SESSION_FILE))
            .ok_or(ConfigError::NoHomeDirectory)
    }

    /// Whether any key material is configured at all.
    pub fn has_key_material(&self) -> bool {
        self.encryption_key.is_some() || self.passphrase.is_some()
    }
}

impl fmt::Debug for SessionStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<Zeroizing<String>>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("SessionStoreConfig")
            .field("session_file", &self.session_file)
            .field("session_file_override", &self.session_file_override)
            .field("encryption_key", &redact(&self.encryption_key))
            .field("passphrase", &redact(&self.passphrase))
            .finish()
    }
}
