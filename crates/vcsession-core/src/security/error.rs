//! Error types for security operations.

use std::path::PathBuf;

use thiserror::Error;

/// Security-related errors.
#[derive(Error, Debug)]
pub enum SecurityError {
    /// No cryptographic backend is configured.
    #[error("Encryption backend unavailable")]
    EncryptionBackendUnavailable,

    /// Encryption error.
    #[error("Encryption error: {0}")]
    EncryptionError(String),

    /// Decryption error (wrong key, tampered or non-encrypted data).
    #[error("Decryption error: {0}")]
    DecryptionError(String),

    /// Key derivation error.
    #[error("Key derivation error: {0}")]
    KeyDerivationError(String),

    /// Explicit key could not be decoded into key material.
    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    /// Salt file required for passphrase-derived keys does not exist.
    #[error("Salt file missing: {}", .0.display())]
    SaltMissing(PathBuf),

    /// Salt file exists but has the wrong size.
    #[error("Malformed salt file {}: expected {expected} bytes, found {found}", path.display())]
    MalformedSalt {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
