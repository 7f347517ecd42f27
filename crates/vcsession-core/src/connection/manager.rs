//! Connection state and the login / logout / resume flows.

use tracing::{error, info, warn};
use zeroize::Zeroizing;

use super::client::{ConnectRequest, RemoteClient};
use super::error::{ConnectionError, ConnectionResult};
use crate::session::{SaveOutcome, SessionMetadata, SessionStore};

/// No live session.
pub const STATUS_DISCONNECTED: &str = "Disconnected";

/// Login in progress.
pub const STATUS_CONNECTING: &str = "Connecting";

/// Live session held.
pub const STATUS_CONNECTED: &str = "Connected";

/// A live session was ended by logout.
pub const STATUS_LOGGED_OUT: &str = "Logged out";

/// Owns the remote handle and a human-readable status.
///
/// ```text
/// Disconnected -> Connecting -> Connected
///                     |             |
///                     v             v (logout)
///                Disconnected   Disconnected
/// ```
///
/// The status is free text so failures can carry their cause. A successful
/// login persists [`SessionMetadata`] (never the password); logout always
/// clears it.
pub struct ConnectionManager<C: RemoteClient> {
    client: Option<C>,
    store: SessionStore,
    handle: Option<C::Handle>,
    status: String,
    last_save: Option<SaveOutcome>,
}

impl<C: RemoteClient> ConnectionManager<C> {
    /// Creates a disconnected manager. `client = None` means no remote client
    /// is available and every login fails.
    pub fn new(client: Option<C>, store: SessionStore) -> Self {
        Self {
            client,
            store,
            handle: None,
            status: STATUS_DISCONNECTED.to_string(),
            last_save: None,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Overwrites the status with arbitrary diagnostic text.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// How the most recent successful login was persisted, if it was.
    pub fn last_save(&self) -> Option<&SaveOutcome> {
        self.last_save.as_ref()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Metadata of the last saved session, if readable.
    pub fn saved_session(&self) -> Option<SessionMetadata> {
        self.store.load()
    }

    /// Removes persisted session state without touching the live handle.
    pub fn clear_saved_session(&self) {
        self.store.clear();
    }

    /// Logs in and persists the session metadata.
    ///
    /// Failures leave the manager disconnected with a status naming the
    /// cause. Failing to persist metadata is only a warning.
    pub fn login(&mut self, username: &str, password: &str, host: &str, port: u16) -> ConnectionResult<()> {
        self.release_handle();
        self.last_save = None;
        self.status = STATUS_CONNECTING.to_string();

        if username.trim().is_empty() {
            return Err(self.fail("username must not be empty".to_string()));
        }
        if host.trim().is_empty() {
            return Err(self.fail("host must not be empty".to_string()));
        }
        let Some(ref client) = self.client else {
            return Err(self.fail("remote client unavailable".to_string()));
        };

        let request = ConnectRequest {
            host,
            username,
            password,
            port,
            insecure_tls: true,
        };

        let connection = match client.connect(&request) {
            Ok(connection) => connection,
            Err(e) => return Err(self.fail(e.to_string())),
        };

        self.handle = Some(connection.handle);
        self.status = STATUS_CONNECTED.to_string();
        info!(host, port, username, "Logged in");

        let metadata = SessionMetadata::new(username, host, port, connection.cookie);
        match self.store.save(&metadata) {
            Ok(outcome) => self.last_save = Some(outcome),
            Err(e) => warn!(error = %e, "Logged in but failed to save session metadata"),
        }

        Ok(())
    }

    fn fail(&mut self, cause: String) -> ConnectionError {
        self.handle = None;
        self.status = format!("Login failed: {}", cause);
        error!("{}", self.status);
        ConnectionError::ConnectFailure(cause)
    }

    /// Ends the session and wipes persisted state.
    ///
    /// Without a live handle, a session recorded in the saved metadata is
    /// ended remotely when the client can rebuild its handle. Persisted state
    /// is cleared in every case. Returns the saved session that was removed.
    pub fn logout(&mut self) -> Option<SessionMetadata> {
        let saved = self.store.load();
        let ended = self.release_handle()
            || saved.as_ref().is_some_and(|saved| self.release_saved_remote_session(saved));
        self.status = if ended { STATUS_LOGGED_OUT } else { STATUS_DISCONNECTED }.to_string();
        self.last_save = None;
        self.store.clear();
        saved
    }

    /// Resumes the saved session with a freshly prompted password.
    ///
    /// `prompt` receives the saved metadata so it can tell the operator which
    /// account it is asking for.
    pub fn resume<F>(&mut self, prompt: F) -> ConnectionResult<SessionMetadata>
    where
        F: FnOnce(&SessionMetadata) -> std::io::Result<Zeroizing<String>>,
    {
        let saved = self.store.load().ok_or(ConnectionError::NoSavedSession)?;
        let password = prompt(&saved)?;

        info!(session = %saved, "Resuming saved session");
        self.login(&saved.username, &password, &saved.host, saved.port)?;
        Ok(saved)
    }

    fn release_handle(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => self.disconnect(handle),
            None => false,
        }
    }

    fn release_saved_remote_session(&self, saved: &SessionMetadata) -> bool {
        let Some(ref client) = self.client else {
            return false;
        };
        match client.restore(saved) {
            Some(handle) => self.disconnect(handle),
            None => false,
        }
    }

    fn disconnect(&self, handle: C::Handle) -> bool {
        let Some(ref client) = self.client else {
            return false;
        };
        match client.disconnect(handle) {
            Ok(()) => {
                info!("Logged out");
                true
            }
            Err(e) => {
                error!(error = %e, "Logout failed");
                false
            }
        }
    }
}
