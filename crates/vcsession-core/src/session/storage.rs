//! File-backed session store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::codec::{DecodeOutcome, SessionCodec};
use super::error::SessionResult;
use super::metadata::SessionMetadata;
use crate::config::SessionStoreConfig;
use crate::files;
use crate::security::{self, Cipher, KeyOrigin, KeyResolver, SaltStore, SecurityError};

/// How a save ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Encrypted with key material of the given origin.
    Encrypted { origin: KeyOrigin },
    /// No key material configured.
    Plaintext,
    /// Key material was configured but could not be used.
    PlaintextFallback { reason: String },
}

impl SaveOutcome {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted { .. })
    }
}

/// Saves, loads and clears the session file.
///
/// The store keeps no key state: key material is resolved on every call.
///
/// # Example
///
/// ```no_run
/// use vcsession_core::{SessionMetadata, SessionStore, SessionStoreConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SessionStoreConfig::from_env().with_session_file("/tmp/session.json");
/// let store = SessionStore::from_config(&config)?;
///
/// store.save(&SessionMetadata::new("administrator@vsphere.local", "vc.example", 443, None))?;
/// let saved = store.load();
/// store.clear();
/// # Ok(())
/// # }
/// ```
pub struct SessionStore {
    path: PathBuf,
    resolver: KeyResolver,
    codec: SessionCodec,
    key_material_configured: bool,
}

impl SessionStore {
    /// Creates a store with an explicit cipher capability (`None` = unavailable).
    ///
    /// # Errors
    ///
    /// Returns an error if the session file location cannot be resolved.
    pub fn new(config: &SessionStoreConfig, cipher: Option<Arc<dyn Cipher>>) -> SessionResult<Self> {
        let path = config.resolve_path()?;
        let salt = SaltStore::for_session_file(&path);

        Ok(Self {
            resolver: KeyResolver::new(config, cipher.clone(), salt),
            codec: SessionCodec::new(cipher),
            key_material_configured: config.has_key_material(),
            path,
        })
    }

    /// Creates a store with the cipher backend compiled into this build.
    pub fn from_config(config: &SessionStoreConfig) -> SessionResult<Self> {
        Self::new(config, security::default_cipher())
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the companion salt file.
    pub fn salt_path(&self) -> &Path {
        self.resolver.salt_store().path()
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persists `metadata`, replacing any previous session.
    ///
    /// Unusable key material degrades to a plaintext write with a warning.
    ///
    /// # Errors
    ///
    /// Invalid metadata, or a filesystem failure writing the file.
    pub fn save(&self, metadata: &SessionMetadata) -> SessionResult<SaveOutcome> {
        metadata.validate()?;

        if let Some(parent) = self.path.parent() {
            files::ensure_private_dir(parent)?;
        }

        let (bytes, outcome) = match self.resolver.resolve(true) {
            Ok(Some(key)) => match self.codec.encode(metadata, Some(&key)) {
                Ok(bytes) => (bytes, SaveOutcome::Encrypted { origin: key.origin() }),
                Err(e) => self.plaintext_fallback(metadata, e.to_string())?,
            },
            Ok(None) if self.key_material_configured => {
                self.plaintext_fallback(metadata, "encryption backend unavailable".to_string())?
            }
            Ok(None) => (self.codec.encode(metadata, None)?, SaveOutcome::Plaintext),
            Err(e) => self.plaintext_fallback(metadata, e.to_string())?,
        };

        files::atomic_write(&self.path, &bytes)?;

        debug!(
            path = %self.path.display(),
            encrypted = outcome.is_encrypted(),
            "Saved session metadata"
        );
        Ok(outcome)
    }

    fn plaintext_fallback(
        &self,
        metadata: &SessionMetadata,
        reason: String,
    ) -> SessionResult<(Vec<u8>, SaveOutcome)> {
        warn!(
            path = %self.path.display(),
            reason = %reason,
            "Saving session metadata without encryption"
        );
        let bytes = self.codec.encode(metadata, None)?;
        Ok((bytes, SaveOutcome::PlaintextFallback { reason }))
    }

    /// Loads the saved session, or `None` if absent or unreadable.
    pub fn load(&self) -> Option<SessionMetadata> {
        self.load_outcome().and_then(DecodeOutcome::into_metadata)
    }

    /// Loads the saved session and reports how it was decoded.
    ///
    /// Returns `None` when there is no file or a passphrase-protected file has
    /// lost its salt. A configured key that cannot be used at all reads the
    /// file as plaintext and reports [`DecodeOutcome::PlaintextFallback`].
    /// Decode failures come back as [`DecodeOutcome::Failed`].
    pub fn load_outcome(&self) -> Option<DecodeOutcome> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved session");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };

        // A missing salt means the file cannot be decrypted. Any other key
        // problem degrades to plaintext, mirroring what `save` wrote.
        let (key, key_unusable) = match self.resolver.resolve(false) {
            Ok(key) => (key, false),
            Err(SecurityError::SaltMissing(salt_path)) => {
                warn!(
                    path = %self.path.display(),
                    salt = %salt_path.display(),
                    "Salt file missing, treating saved session as unreadable"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Session key unusable, reading saved session as plaintext"
                );
                (None, true)
            }
        };

        let outcome = self.codec.decode(&bytes, key.as_ref());
        match outcome {
            DecodeOutcome::PlaintextFallback(_) => {
                warn!(
                    path = %self.path.display(),
                    "Session file did not decrypt with the configured key, read as plaintext"
                );
            }
            DecodeOutcome::Failed(ref e) => {
                warn!(path = %self.path.display(), error = %e, "Saved session is corrupt");
            }
            DecodeOutcome::Plaintext(metadata) if key_unusable => {
                return Some(DecodeOutcome::PlaintextFallback(metadata));
            }
            DecodeOutcome::Decrypted(_) | DecodeOutcome::Plaintext(_) => {}
        }
        Some(outcome)
    }

    /// Removes the session file and its salt file.
    ///
    /// Each removal is best-effort; failures are logged and never returned.
    pub fn clear(&self) {
        match files::remove_if_exists(&self.path) {
            Ok(true) => info!(path = %self.path.display(), "Removed saved session"),
            Ok(false) => debug!(path = %self.path.display(), "No saved session to remove"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove session file"),
        }

        if let Err(e) = self.resolver.salt_store().clear() {
            warn!(path = %self.salt_path().display(), error = %e, "Failed to remove salt file");
        }
    }
}
