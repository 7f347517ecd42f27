//! Error types for session persistence.

use thiserror::Error;

use crate::config::ConfigError;
use crate::security::SecurityError;

/// Session persistence errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Stored session could not be decoded under any key regime.
    #[error("Corrupt session: {0}")]
    CorruptSession(String),

    /// Metadata violates an invariant (empty username or host).
    #[error("Invalid session metadata: {0}")]
    InvalidMetadata(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key resolution or cipher errors
    #[error("Security error: {0}")]
    Security(#[from] SecurityError),

    /// I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for session persistence.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
