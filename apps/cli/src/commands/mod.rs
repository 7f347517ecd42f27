//! Command implementations for the vcsession CLI.

pub mod clear_session;
pub mod login;
pub mod logout;
pub mod resume;
pub mod status;

use anyhow::{Context, Result};
use colored::Colorize;
use rpassword::read_password;
use std::io::{self, Write};
use vcsession_core::{
    ConnectionManager, DecodeOutcome, SaveOutcome, SessionStore, SessionStoreConfig, VsphereClient,
};
use zeroize::Zeroizing;

/// Opens the session store described by `config`.
fn open_store(config: &SessionStoreConfig) -> Result<SessionStore> {
    SessionStore::from_config(config).context("Failed to locate session file")
}

/// Connection manager backed by the vSphere REST client.
fn open_manager(config: &SessionStoreConfig) -> Result<ConnectionManager<VsphereClient>> {
    Ok(ConnectionManager::new(Some(VsphereClient::new()), open_store(config)?))
}

/// Prompts for a password without echo.
fn prompt_password(prompt: &str) -> io::Result<Zeroizing<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    read_password().map(Zeroizing::new)
}

/// How a decoded session file was stored: `encrypted`, `plaintext` or `unreadable`.
fn describe_decoded(outcome: Option<&DecodeOutcome>) -> String {
    match outcome {
        Some(DecodeOutcome::Decrypted(_)) => "encrypted".green().to_string(),
        Some(DecodeOutcome::Plaintext(_)) => "plaintext".to_string(),
        Some(DecodeOutcome::PlaintextFallback(_)) => "plaintext (key configured)".yellow().to_string(),
        Some(DecodeOutcome::Failed(_)) | None => "unreadable".red().to_string(),
    }
}

/// How a login's session file was written.
fn describe_save(outcome: Option<&SaveOutcome>) -> String {
    match outcome {
        Some(SaveOutcome::Encrypted { .. }) => "encrypted".green().to_string(),
        Some(SaveOutcome::Plaintext) => "plaintext".to_string(),
        Some(SaveOutcome::PlaintextFallback { reason }) => {
            format!("plaintext, encryption failed: {}", reason).yellow().to_string()
        }
        None => "not saved".red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vcsession_core::{KeyOrigin, SessionMetadata};

    #[test]
    fn test_describe_decoded() {
        colored::control::set_override(false);
        let temp_dir = TempDir::new().unwrap();
        let config = SessionStoreConfig::new().with_session_file(temp_dir.path().join("s.json"));
        let store = SessionStore::new(&config, None).unwrap();

        assert_eq!(describe_decoded(store.load_outcome().as_ref()), "unreadable");

        store.save(&SessionMetadata::new("admin", "vc.example", 443, None)).unwrap();
        assert_eq!(describe_decoded(store.load_outcome().as_ref()), "plaintext");
    }

    #[test]
    fn test_describe_save() {
        colored::control::set_override(false);
        let encrypted = SaveOutcome::Encrypted { origin: KeyOrigin::Passphrase };
        let fallback = SaveOutcome::PlaintextFallback { reason: "no backend".to_string() };

        assert_eq!(describe_save(Some(&encrypted)), "encrypted");
        assert_eq!(describe_save(Some(&fallback)), "plaintext, encryption failed: no backend");
        assert_eq!(describe_save(None), "not saved");
    }
}
