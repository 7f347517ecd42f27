//! Per-session-file salt storage.
//!
//! The salt lives next to the session file as `<session_file>.salt`: 16 raw
//! bytes, no header. It is created on the first passphrase-protected save and
//! reused afterwards, so the same passphrase always derives the same key for
//! the same file. Removing it makes earlier ciphertext undecryptable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::RngCore;
use rand::rngs::OsRng;
use tracing::{debug, warn};

use super::error::{SecurityError, SecurityResult};
use crate::files;

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Suffix appended to the session file name.
const SALT_SUFFIX: &str = ".salt";

/// Salt file companion of one session file.
#[derive(Debug, Clone)]
pub struct SaltStore {
    path: PathBuf,
}

impl SaltStore {
    /// Salt store for `session_file` (`session.json` -> `session.json.salt`).
    pub fn for_session_file(session_file: &Path) -> Self {
        let mut name = session_file.as_os_str().to_owned();
        name.push(SALT_SUFFIX);
        Self { path: PathBuf::from(name) }
    }

    /// Location of the salt file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the existing salt (read path).
    ///
    /// # Errors
    ///
    /// `SaltMissing` if there is no salt file, `MalformedSalt` if it is not
    /// exactly 16 bytes.
    pub fn get(&self) -> SecurityResult<[u8; SALT_LENGTH]> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SecurityError::SaltMissing(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        <[u8; SALT_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| SecurityError::MalformedSalt {
            path: self.path.clone(),
            expected: SALT_LENGTH,
            found: bytes.len(),
        })
    }

    /// Reads the salt, creating and persisting a fresh one if absent (write path).
    ///
    /// A malformed salt file is replaced; whatever it protected was unreadable anyway.
    pub fn get_or_create(&self) -> SecurityResult<[u8; SALT_LENGTH]> {
        match self.get() {
            Ok(salt) => Ok(salt),
            Err(SecurityError::SaltMissing(_)) => self.create(),
            Err(SecurityError::MalformedSalt { found, .. }) => {
                warn!(path = %self.path.display(), found, "Replacing malformed salt file");
                self.create()
            }
            Err(e) => Err(e),
        }
    }

    /// Removes the salt file. Returns `false` if it did not exist.
    pub fn clear(&self) -> SecurityResult<bool> {
        Ok(files::remove_if_exists(&self.path)?)
    }

    fn create(&self) -> SecurityResult<[u8; SALT_LENGTH]> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);

        if let Some(parent) = self.path.parent() {
            files::ensure_private_dir(parent)?;
        }
        files::atomic_write(&self.path, &salt)?;

        debug!(path = %self.path.display(), "Created session salt file");
        Ok(salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SaltStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SaltStore::for_session_file(&temp_dir.path().join("session.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_salt_path_appends_suffix() {
        let store = SaltStore::for_session_file(Path::new("/tmp/x/session.json"));
        assert_eq!(store.path(), Path::new("/tmp/x/session.json.salt"));
    }

    #[test]
    fn test_get_missing_salt() {
        let (store, _temp_dir) = create_test_store();
        assert!(matches!(store.get(), Err(SecurityError::SaltMissing(_))));
    }

    #[test]
    fn test_get_or_create_is_stable() {
        let (store, _temp_dir) = create_test_store();

        let first = store.get_or_create().unwrap();
        let second = store.get_or_create().unwrap();

        assert_eq!(first, second);
        assert_eq!(store.get().unwrap(), first);
        assert_eq!(fs::read(store.path()).unwrap(), first.to_vec());
    }

    #[test]
    fn test_clear_then_recreate_changes_salt() {
        let (store, _temp_dir) = create_test_store();

        let first = store.get_or_create().unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());

        let second = store.get_or_create().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_salt() {
        let (store, _temp_dir) = create_test_store();
        fs::write(store.path(), b"short").unwrap();

        assert!(matches!(
            store.get(),
            Err(SecurityError::MalformedSalt { found: 5, .. })
        ));

        let replaced = store.get_or_create().unwrap();
        assert_eq!(store.get().unwrap(), replaced);
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SaltStore::for_session_file(&temp_dir.path().join("nested").join("s.json"));

        store.get_or_create().unwrap();
        assert!(store.path().exists());
    }
}
