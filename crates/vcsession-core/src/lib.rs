//! vcsession core - authenticated sessions against vCenter-style endpoints.
//!
//! This crate provides:
//! - Session metadata persistence (never credentials) with optional encryption
//! - Key material resolution from an explicit key or a passphrase plus salt
//! - A connection manager tracking the remote handle and a status string
//!
//! # Example
//!
//! ```rust,no_run
//! use vcsession_core::{SessionStore, SessionStoreConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionStoreConfig::from_env();
//! let store = SessionStore::from_config(&config)?;
//!
//! if let Some(saved) = store.load() {
//!     println!("last session: {}@{}:{}", saved.username, saved.host, saved.port);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
mod files;
pub mod security;
pub mod session;

pub use config::{
    ConfigError, DEFAULT_SESSION_DIR, DEFAULT_SESSION_FILE, ENV_SESSION_FILE, ENV_SESSION_KEY,
    ENV_SESSION_PASSPHRASE, SessionStoreConfig,
};
pub use connection::{
    ClientError, ConnectRequest, Connection, ConnectionError, ConnectionManager,
    ConnectionResult, RemoteClient,
};
#[cfg(feature = "vsphere")]
pub use connection::{VsphereClient, VsphereSession};
#[cfg(feature = "encryption")]
pub use security::AesGcmCipher;
pub use security::{Cipher, KeyMaterial, KeyOrigin, KeyResolver, SaltStore, SecurityError};
pub use session::{
    DecodeOutcome, SaveOutcome, SessionCodec, SessionError, SessionMetadata, SessionResult,
    SessionStore,
};
