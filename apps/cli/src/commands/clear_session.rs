//! Clear-session command implementation.

use anyhow::Result;
use colored::Colorize;
use vcsession_core::SessionStoreConfig;

use super::open_store;

/// Deletes the saved session and salt files without contacting the server.
pub fn execute(config: &SessionStoreConfig) -> Result<()> {
    let store = open_store(config)?;
    store.clear();
    println!("{} {}", "✓ Cleared saved session".green(), store.path().display());
    Ok(())
}
