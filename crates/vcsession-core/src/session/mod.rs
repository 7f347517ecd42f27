//! Session metadata persistence.
//!
//! Only non-secret identity (host, user, port, timestamp, optional token) is
//! ever written. The file is encrypted when key material is configured and a
//! cipher backend is available, and plaintext JSON otherwise.

mod codec;
mod error;
mod metadata;
mod storage;

pub use codec::{DecodeOutcome, SessionCodec};
pub use error::{SessionError, SessionResult};
pub use metadata::{DEFAULT_PORT, SessionMetadata, now_timestamp};
pub use storage::{SaveOutcome, SessionStore};
