//! Cipher capability for session encryption.
//!
//! The bundled backend uses AES-256-GCM for authenticated encryption and
//! PBKDF2-HMAC-SHA256 for passphrase key derivation.
//!
//! Envelope layout:
//!
//! ```text
//! [version: 1 byte = 0x01][nonce: 12 bytes][ciphertext || tag: 16 bytes]
//! ```

use super::error::SecurityResult;
use super::key::KeyMaterial;

/// A symmetric encryption backend.
///
/// Implementations must provide authenticated encryption: `decrypt` fails for
/// a wrong key or any modification of the envelope.
pub trait Cipher: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Derives a 32-byte key from a passphrase and salt.
    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> SecurityResult<KeyMaterial>;

    /// Encrypts `plaintext` into a self-contained envelope.
    fn encrypt(&self, key: &KeyMaterial, plaintext: &[u8]) -> SecurityResult<Vec<u8>>;

    /// Opens an envelope produced by [`Cipher::encrypt`].
    fn decrypt(&self, key: &KeyMaterial, envelope: &[u8]) -> SecurityResult<Vec<u8>>;
}

#[cfg(feature = "encryption")]
pub use backend::AesGcmCipher;

#[cfg(feature = "encryption")]
mod backend {
    use aes_gcm::{
        Aes256Gcm, Nonce,
        aead::{Aead, AeadCore, KeyInit, OsRng},
    };
    use pbkdf2::pbkdf2_hmac;
    use sha2::Sha256;
    use zeroize::Zeroizing;

    use super::Cipher;
    use crate::security::error::{SecurityError, SecurityResult};
    use crate::security::key::{KEY_LENGTH, KeyMaterial, KeyOrigin, PBKDF2_ITERATIONS};

    /// Envelope format version.
    const ENVELOPE_VERSION: u8 = 0x01;

    /// Nonce length for AES-GCM.
    const NONCE_LENGTH: usize = 12;

    /// Authentication tag length for AES-GCM.
    const TAG_LENGTH: usize = 16;

    /// AES-256-GCM with PBKDF2-HMAC-SHA256 key derivation.
    #[derive(Debug, Clone, Default)]
    pub struct AesGcmCipher;

    impl AesGcmCipher {
        pub fn new() -> Self {
            Self
        }

        fn aead(key: &KeyMaterial) -> SecurityResult<Aes256Gcm> {
            Aes256Gcm::new_from_slice(key.as_bytes())
                .map_err(|_| SecurityError::EncryptionError("invalid key length".to_string()))
        }
    }

    impl Cipher for AesGcmCipher {
        fn name(&self) -> &'static str {
            "aes-256-gcm"
        }

        fn derive_key(&self, passphrase: &str, salt: &[u8]) -> SecurityResult<KeyMaterial> {
            if salt.is_empty() {
                return Err(SecurityError::KeyDerivationError("empty salt".to_string()));
            }

            let mut bytes = Zeroizing::new([0u8; KEY_LENGTH]);
            pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, bytes.as_mut_slice());
            Ok(KeyMaterial::from_bytes(bytes, KeyOrigin::Passphrase))
        }

        fn encrypt(&self, key: &KeyMaterial, plaintext: &[u8]) -> SecurityResult<Vec<u8>> {
            let cipher = Self::aead(key)?;
            let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

            let ciphertext = cipher
                .encrypt(&nonce, plaintext)
                .map_err(|e| SecurityError::EncryptionError(format!("Encryption failed: {}", e)))?;

            let mut envelope = Vec::with_capacity(1 + NONCE_LENGTH + ciphertext.len());
            envelope.push(ENVELOPE_VERSION);
            envelope.extend_from_slice(&nonce);
            envelope.extend_from_slice(&ciphertext);
            Ok(envelope)
        }

        fn decrypt(&self, key: &KeyMaterial, envelope: &[u8]) -> SecurityResult<Vec<u8>> {
            let Some((&version, rest)) = envelope.split_first() else {
                return Err(SecurityError::DecryptionError("empty envelope".to_string()));
            };
            if version != ENVELOPE_VERSION {
                return Err(SecurityError::DecryptionError(format!(
                    "unsupported envelope version {:#04x}",
                    version
                )));
            }
            if rest.len() < NONCE_LENGTH + TAG_LENGTH {
                return Err(SecurityError::DecryptionError("envelope too short".to_string()));
            }

            let (nonce, ciphertext) = rest.split_at(NONCE_LENGTH);
            Self::aead(key)?
                .decrypt(Nonce::from_slice(nonce), ciphertext)
                .map_err(|_| SecurityError::DecryptionError("authentication failed".to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn test_key(fill: u8) -> KeyMaterial {
            KeyMaterial::from_bytes(Zeroizing::new([fill; KEY_LENGTH]), KeyOrigin::Explicit)
        }

        #[test]
        fn test_encrypt_decrypt() {
            let cipher = AesGcmCipher::new();
            let key = test_key(7);

            let envelope = cipher.encrypt(&key, b"{\"host\":\"h\"}").unwrap();
            assert_eq!(envelope[0], ENVELOPE_VERSION);
            assert_eq!(envelope.len(), 1 + NONCE_LENGTH + 12 + TAG_LENGTH);

            let plaintext = cipher.decrypt(&key, &envelope).unwrap();
            assert_eq!(plaintext, b"{\"host\":\"h\"}");
        }

        #[test]
        fn test_nonce_is_fresh_per_encryption() {
            let cipher = AesGcmCipher::new();
            let key = test_key(7);

            let a = cipher.encrypt(&key, b"same").unwrap();
            let b = cipher.encrypt(&key, b"same").unwrap();
            assert_ne!(a, b);
        }

        #[test]
        fn test_wrong_key_fails() {
            let cipher = AesGcmCipher::new();
            let envelope = cipher.encrypt(&test_key(1), b"secret").unwrap();

            let result = cipher.decrypt(&test_key(2), &envelope);
            assert!(matches!(result, Err(SecurityError::DecryptionError(_))));
        }

        #[test]
        fn test_tampered_envelope_fails() {
            let cipher = AesGcmCipher::new();
            let key = test_key(1);
            let mut envelope = cipher.encrypt(&key, b"secret").unwrap();
            let last = envelope.len() - 1;
            envelope[last] ^= 0x01;

            assert!(cipher.decrypt(&key, &envelope).is_err());
        }

        #[test]
        fn test_plaintext_is_not_an_envelope() {
            let cipher = AesGcmCipher::new();
            let result = cipher.decrypt(&test_key(1), br#"{"username":"u","host":"h"}"#);
            assert!(matches!(result, Err(SecurityError::DecryptionError(_))));

            assert!(cipher.decrypt(&test_key(1), b"").is_err());
        }

        #[test]
        fn test_derive_key_deterministic_per_salt() {
            let cipher = AesGcmCipher::new();

            let a = cipher.derive_key("passphrase", &[1u8; 16]).unwrap();
            let b = cipher.derive_key("passphrase", &[1u8; 16]).unwrap();
            let c = cipher.derive_key("passphrase", &[2u8; 16]).unwrap();

            assert_eq!(a.as_bytes(), b.as_bytes());
            assert_ne!(a.as_bytes(), c.as_bytes());
            assert_eq!(a.origin(), KeyOrigin::Passphrase);
        }

        #[test]
        fn test_derive_key_rejects_empty_salt() {
            let cipher = AesGcmCipher::new();
            assert!(matches!(
                cipher.derive_key("passphrase", &[]),
                Err(SecurityError::KeyDerivationError(_))
            ));
        }
    }
}
