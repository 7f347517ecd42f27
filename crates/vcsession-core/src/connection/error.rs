//! Error types for remote connections.

use thiserror::Error;

/// Errors raised by a [`RemoteClient`](super::RemoteClient) implementation.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or TLS failure before the endpoint answered.
    #[error("Connection failed: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success status (bad credentials, etc.).
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Endpoint answered with something that is not a session token.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for remote client calls.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Connection manager errors.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Login did not produce a session.
    #[error("Login failed: {0}")]
    ConnectFailure(String),

    /// Resume requested with nothing stored.
    #[error("No saved session")]
    NoSavedSession,

    /// The password side-channel failed.
    #[error("Password prompt failed: {0}")]
    PasswordPrompt(#[from] std::io::Error),
}

/// Result type alias for connection manager operations.
pub type ConnectionResult<T> = std::result::Result<T, ConnectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_rejected() {
        let err = ClientError::Rejected { status: 401, message: "Unauthorized".to_string() };
        let msg = format!("{}", err);
        assert!(msg.contains("401"));
        assert!(msg.contains("Unauthorized"));
    }

    #[test]
    fn test_connection_error_connect_failure() {
        let err = ConnectionError::ConnectFailure("Connection failed: refused".to_string());
        assert_eq!(format!("{}", err), "Login failed: Connection failed: refused");
    }

    #[test]
    fn test_connection_error_no_saved_session() {
        assert_eq!(format!("{}", ConnectionError::NoSavedSession), "No saved session");
    }
}
