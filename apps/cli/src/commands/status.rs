//! Status command implementation.

use anyhow::Result;
use colored::Colorize;
use serde_json::{Value, json};
use vcsession_core::{SessionMetadata, SessionStoreConfig};

use super::{describe_decoded, open_store};

/// JSON view of a saved session. The token itself is never printed.
fn session_json(saved: &SessionMetadata) -> Value {
    json!({
        "username": saved.username,
        "host": saved.host,
        "port": saved.port,
        "timestamp": saved.timestamp,
        "token": saved.cookie.is_some(),
    })
}

/// Shows the saved session.
pub fn execute(config: &SessionStoreConfig, json_output: bool) -> Result<()> {
    let store = open_store(config)?;
    let outcome = store.load_outcome();
    let saved = outcome.as_ref().and_then(|o| o.metadata());

    if json_output {
        let output = json!({
            "session_file": store.path().display().to_string(),
            "saved": saved.map(session_json),
            "encrypted": outcome.as_ref().is_some_and(|o| o.is_encrypted()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Saved Session".bold().cyan());
    println!();
    println!("  File: {}", store.path().display());

    match saved {
        Some(saved) => {
            println!("  Session: {}", saved.to_string().green());
            println!("  Saved at: {} (unix seconds)", saved.timestamp);
            println!("  Token: {}", if saved.cookie.is_some() { "yes" } else { "no" });
            println!("  Storage: {}", describe_decoded(outcome.as_ref()));
        }
        None if store.exists() => {
            println!("  Session: {}", "unreadable with the configured key".red());
        }
        None => println!("  Session: {}", "none".yellow()),
    }

    Ok(())
}
