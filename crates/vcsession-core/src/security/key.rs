//! Key material and its resolution from configuration.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use tracing::debug;
use zeroize::Zeroizing;

use super::cipher::Cipher;
use super::error::{SecurityError, SecurityResult};
use super::salt::SaltStore;
use crate::config::SessionStoreConfig;

/// Symmetric key length in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// PBKDF2-HMAC-SHA256 iterations for passphrase-derived keys.
pub const PBKDF2_ITERATIONS: u32 = 390_000;

/// Where a key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Supplied directly through configuration.
    Explicit,
    /// Derived from a passphrase and the session file's salt.
    Passphrase,
}

/// A 32-byte symmetric key, zeroized on drop.
pub struct KeyMaterial {
    bytes: Zeroizing<[u8; KEY_LENGTH]>,
    origin: KeyOrigin,
}

impl KeyMaterial {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: Zeroizing<[u8; KEY_LENGTH]>, origin: KeyOrigin) -> Self {
        Self { bytes, origin }
    }

    /// Decodes an explicit key.
    ///
    /// Accepts standard and URL-safe base64, padded or not. The decoded key
    /// must be exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> SecurityResult<Self> {
        let trimmed = encoded.trim();
        let decoded = [STANDARD, URL_SAFE, STANDARD_NO_PAD, URL_SAFE_NO_PAD]
            .iter()
            .find_map(|engine| engine.decode(trimmed).ok())
            .map(Zeroizing::new)
            .ok_or_else(|| SecurityError::InvalidKey("not valid base64".to_string()))?;

        if decoded.len() != KEY_LENGTH {
            return Err(SecurityError::InvalidKey(format!(
                "expected {} bytes, found {}",
                KEY_LENGTH,
                decoded.len()
            )));
        }

        let mut bytes = Zeroizing::new([0u8; KEY_LENGTH]);
        bytes.copy_from_slice(&decoded);
        Ok(Self::from_bytes(bytes, KeyOrigin::Explicit))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }

    pub fn origin(&self) -> KeyOrigin {
        self.origin
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("bytes", &"<redacted>")
            .field("origin", &self.origin)
            .finish()
    }
}

/// Decides which key, if any, protects the session file.
///
/// Key material is resolved on every call; nothing is cached between
/// operations.
///
/// Precedence:
/// 1. Explicit key (no derivation needed)
/// 2. Passphrase + salt via PBKDF2
/// 3. None, meaning plaintext
///
/// Without a cipher backend the resolver always answers `None`; the session
/// store reports that as a plaintext fallback.
pub struct KeyResolver {
    explicit_key: Option<Zeroizing<String>>,
    passphrase: Option<Zeroizing<String>>,
    cipher: Option<Arc<dyn Cipher>>,
    salt: SaltStore,
}

impl KeyResolver {
    /// Creates a resolver over the configured key sources.
    pub fn new(config: &SessionStoreConfig, cipher: Option<Arc<dyn Cipher>>, salt: SaltStore) -> Self {
        Self {
            explicit_key: config.encryption_key.clone(),
            passphrase: config.passphrase.clone(),
            cipher,
            salt,
        }
    }

    /// Resolves key material for a save (`for_write`) or a load.
    ///
    /// # Errors
    ///
    /// - `InvalidKey` if the explicit key cannot be decoded
    /// - `SaltMissing` on the read path when no salt file exists
    /// - `Io` if the salt file cannot be read or created
    pub fn resolve(&self, for_write: bool) -> SecurityResult<Option<KeyMaterial>> {
        if let Some(ref encoded) = self.explicit_key {
            if self.cipher.is_none() {
                debug!("Encryption key configured but no cipher backend available");
                return Ok(None);
            }
            debug!("Using explicit session encryption key");
            return KeyMaterial::from_base64(encoded).map(Some);
        }

        if let Some(ref passphrase) = self.passphrase {
            let Some(ref cipher) = self.cipher else {
                debug!("Passphrase configured but no cipher backend available");
                return Ok(None);
            };

            let salt = if for_write { self.salt.get_or_create()? } else { self.salt.get()? };
            debug!(cipher = cipher.name(), "Deriving session key from passphrase");
            return cipher.derive_key(passphrase, &salt).map(Some);
        }

        Ok(None)
    }

    /// Salt store for the session file this resolver serves.
    pub fn salt_store(&self) -> &SaltStore {
        &self.salt
    }

    /// Whether a cipher backend is available.
    pub fn has_cipher(&self) -> bool {
        self.cipher.is_some()
    }
}
