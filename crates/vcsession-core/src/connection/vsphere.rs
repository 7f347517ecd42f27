//! vSphere Automation REST client.
//!
//! `POST /api/session` with basic auth returns a session token as a JSON
//! string; `DELETE /api/session` with the token header ends it.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::debug;

use super::client::{ConnectRequest, Connection, RemoteClient};
use super::error::{ClientError, ClientResult};
use crate::session::SessionMetadata;

const SESSION_PATH: &str = "/api/session";
const SESSION_HEADER: &str = "vmware-api-session-id";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY: usize = 200;

/// Live vSphere API session.
#[derive(Debug, Clone)]
pub struct VsphereSession {
    base_url: String,
    token: String,
    insecure_tls: bool,
}

impl VsphereSession {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Blocking [`RemoteClient`] for vCenter's REST session endpoint.
#[derive(Debug, Clone)]
pub struct VsphereClient {
    timeout: Duration,
    scheme: &'static str,
}

impl Default for VsphereClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VsphereClient {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            scheme: "https",
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Talks plain HTTP instead of HTTPS (local test endpoints only).
    #[must_use]
    pub fn with_plain_http(mut self) -> Self {
        self.scheme = "http";
        self
    }

    fn http(&self, insecure_tls: bool) -> ClientResult<Client> {
        Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(insecure_tls)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}

/// `scheme://host:port`, bracketing bare IPv6 literals.
fn base_url(scheme: &str, host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("{}://[{}]:{}", scheme, host, port)
    } else {
        format!("{}://{}:{}", scheme, host, port)
    }
}

fn rejected(response: reqwest::blocking::Response) -> ClientError {
    let status = response.status().as_u16();
    let mut message = response.text().unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    ClientError::Rejected { status, message }
}

impl RemoteClient for VsphereClient {
    type Handle = VsphereSession;

    fn connect(&self, request: &ConnectRequest<'_>) -> ClientResult<Connection<VsphereSession>> {
        let base_url = base_url(self.scheme, request.host, request.port);
        debug!(url = %base_url, username = request.username, "Creating vSphere session");

        let response = self
            .http(request.insecure_tls)?
            .post(format!("{}{}", base_url, SESSION_PATH))
            .basic_auth(request.username, Some(request.password))
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejected(response));
        }

        let token: String = response
            .json()
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        if token.is_empty() {
            return Err(ClientError::InvalidResponse("empty session token".to_string()));
        }

        Ok(Connection {
            cookie: Some(token.clone()),
            handle: VsphereSession {
                base_url,
                token,
                insecure_tls: request.insecure_tls,
            },
        })
    }

    fn disconnect(&self, session: VsphereSession) -> ClientResult<()> {
        let response = self
            .http(session.insecure_tls)?
            .delete(format!("{}{}", session.base_url, SESSION_PATH))
            .header(SESSION_HEADER, &session.token)
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        // Already expired on the server side.
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("vSphere session was already invalid");
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(rejected(response));
        }
        Ok(())
    }

    fn restore(&self, metadata: &SessionMetadata) -> Option<VsphereSession> {
        let token = metadata.cookie.as_ref().filter(|t| !t.is_empty())?;
        Some(VsphereSession {
            base_url: base_url(self.scheme, &metadata.host, metadata.port),
            token: token.clone(),
            insecure_tls: true,
        })
    }
}
