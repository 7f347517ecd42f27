//! Remote client capability.

use std::fmt;

use super::error::ClientResult;
use crate::session::SessionMetadata;

/// Parameters of one login attempt.
pub struct ConnectRequest<'a> {
    pub host: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub port: u16,
    /// Skip certificate validation (self-signed management endpoints).
    pub insecure_tls: bool,
}

impl fmt::Debug for ConnectRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectRequest")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("insecure_tls", &self.insecure_tls)
            .finish()
    }
}

/// An established remote session.
#[derive(Debug)]
pub struct Connection<H> {
    /// Live handle, passed back to [`RemoteClient::disconnect`].
    pub handle: H,
    /// Session token worth persisting, if the endpoint issues one.
    pub cookie: Option<String>,
}

/// Establishes and ends sessions on a management endpoint.
pub trait RemoteClient {
    /// Live session handle.
    type Handle;

    /// Authenticates and opens a session.
    fn connect(&self, request: &ConnectRequest<'_>) -> ClientResult<Connection<Self::Handle>>;

    /// Ends a session.
    fn disconnect(&self, handle: Self::Handle) -> ClientResult<()>;

    /// Rebuilds a handle from persisted metadata, if the client supports it.
    ///
    /// Lets a later process end a remote session it did not open.
    fn restore(&self, _metadata: &SessionMetadata) -> Option<Self::Handle> {
        None
    }
}
