//! Key material, salt storage and the cipher capability.
//!
//! This module provides:
//! - The [`Cipher`] capability (AES-256-GCM backend behind the `encryption` feature)
//! - [`KeyResolver`], choosing between an explicit key, a passphrase or plaintext
//! - [`SaltStore`], the `<session_file>.salt` companion file

mod cipher;
mod error;
mod key;
mod salt;

use std::sync::Arc;

#[cfg(feature = "encryption")]
pub use cipher::AesGcmCipher;
pub use cipher::Cipher;
pub use error::{SecurityError, SecurityResult};
pub use key::{KEY_LENGTH, KeyMaterial, KeyOrigin, KeyResolver, PBKDF2_ITERATIONS};
pub use salt::{SALT_LENGTH, SaltStore};

/// The cipher backend compiled into this build, if any.
pub fn default_cipher() -> Option<Arc<dyn Cipher>> {
    #[cfg(feature = "encryption")]
    {
        Some(Arc::new(AesGcmCipher::new()))
    }

    #[cfg(not(feature = "encryption"))]
    {
        None
    }
}
