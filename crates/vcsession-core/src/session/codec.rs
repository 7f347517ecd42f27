//! Session metadata encoding.
//!
//! Metadata is serialized as compact JSON. With key material it is wrapped in
//! the cipher's envelope; without, the JSON bytes are stored as-is.
//!
//! Decoding tries authenticated decryption first and then falls back to
//! reading the raw bytes as JSON. The fallback keeps files written under a
//! different key regime readable, but it also accepts any corrupted envelope
//! that happens to parse as JSON. Callers see which branch was taken through
//! [`DecodeOutcome`].

use std::sync::Arc;

use tracing::debug;

use super::error::{SessionError, SessionResult};
use super::metadata::SessionMetadata;
use crate::security::{Cipher, KeyMaterial, SecurityError};

/// Result of decoding a stored session.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// Authenticated decryption succeeded.
    Decrypted(SessionMetadata),
    /// A key was available but decryption failed; the raw bytes parsed as JSON.
    PlaintextFallback(SessionMetadata),
    /// No key was available; the raw bytes parsed as JSON.
    Plaintext(SessionMetadata),
    /// Nothing could be decoded.
    Failed(SessionError),
}

impl DecodeOutcome {
    pub fn metadata(&self) -> Option<&SessionMetadata> {
        match self {
            Self::Decrypted(m) | Self::PlaintextFallback(m) | Self::Plaintext(m) => Some(m),
            Self::Failed(_) => None,
        }
    }

    pub fn into_metadata(self) -> Option<SessionMetadata> {
        match self {
            Self::Decrypted(m) | Self::PlaintextFallback(m) | Self::Plaintext(m) => Some(m),
            Self::Failed(_) => None,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Decrypted(_))
    }
}

/// Encodes and decodes [`SessionMetadata`].
#[derive(Clone, Default)]
pub struct SessionCodec {
    cipher: Option<Arc<dyn Cipher>>,
}

impl SessionCodec {
    /// Codec using `cipher` when key material is supplied.
    pub fn new(cipher: Option<Arc<dyn Cipher>>) -> Self {
        Self { cipher }
    }

    /// Codec that can only read and write plaintext.
    pub fn plaintext() -> Self {
        Self { cipher: None }
    }

    /// Serializes `metadata`, encrypting it when `key` is present.
    ///
    /// # Errors
    ///
    /// `EncryptionBackendUnavailable` if a key is given to a plaintext-only
    /// codec, or any cipher failure.
    pub fn encode(&self, metadata: &SessionMetadata, key: Option<&KeyMaterial>) -> SessionResult<Vec<u8>> {
        let json = serde_json::to_vec(metadata)?;

        let Some(key) = key else {
            return Ok(json);
        };
        let cipher = self.cipher.as_ref().ok_or(SecurityError::EncryptionBackendUnavailable)?;
        Ok(cipher.encrypt(key, &json)?)
    }

    /// Decodes stored bytes.
    pub fn decode(&self, bytes: &[u8], key: Option<&KeyMaterial>) -> DecodeOutcome {
        let Some(key) = key else {
            return match parse(bytes) {
                Ok(metadata) => DecodeOutcome::Plaintext(metadata),
                Err(e) => DecodeOutcome::Failed(e),
            };
        };

        if let Some(ref cipher) = self.cipher {
            match cipher.decrypt(key, bytes) {
                Ok(plaintext) => match parse(&plaintext) {
                    Ok(metadata) => return DecodeOutcome::Decrypted(metadata),
                    Err(e) => debug!(error = %e, "Decrypted session is not valid metadata"),
                },
                Err(e) => debug!(error = %e, "Session decryption failed, trying plaintext"),
            }
        }

        match parse(bytes) {
            Ok(metadata) => DecodeOutcome::PlaintextFallback(metadata),
            Err(e) => DecodeOutcome::Failed(e),
        }
    }
}

fn parse(bytes: &[u8]) -> SessionResult<SessionMetadata> {
    let metadata: SessionMetadata =
        serde_json::from_slice(bytes).map_err(|e| SessionError::CorruptSession(e.to_string()))?;
    metadata.validate().map_err(|e| SessionError::CorruptSession(e.to_string()))?;
    Ok(metadata)
}
