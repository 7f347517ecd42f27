//! Persisted session metadata.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::error::{SessionError, SessionResult};

/// Default HTTPS port of the management endpoint.
pub const DEFAULT_PORT: u16 = 443;

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Identity of a prior successful connection.
///
/// There is deliberately no password field: the type cannot carry one, so no
/// encoding of it can leak one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Account used to log in.
    pub username: String,
    /// Endpoint host name or address.
    pub host: String,
    /// Endpoint port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds since the Unix epoch when the metadata was built.
    pub timestamp: u64,
    /// Opaque session token issued by the endpoint, if the client exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl SessionMetadata {
    /// Builds metadata stamped with the current time.
    pub fn new(
        username: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        cookie: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            host: host.into(),
            port,
            timestamp: now_timestamp(),
            cookie,
        }
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Checks that username and host are non-empty.
    pub fn validate(&self) -> SessionResult<()> {
        if self.username.trim().is_empty() {
            return Err(SessionError::InvalidMetadata("username must not be empty".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(SessionError::InvalidMetadata("host must not be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for SessionMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.username, self.host, self.port)
    }
}

/// Current time in seconds since the Unix epoch.
pub fn now_timestamp() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
