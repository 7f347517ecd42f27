//! Logout command implementation.

use anyhow::Result;
use colored::Colorize;
use vcsession_core::SessionStoreConfig;
use vcsession_core::connection::STATUS_LOGGED_OUT;

use super::open_manager;

/// Ends the saved remote session, if any, and deletes the local files.
pub fn execute(config: &SessionStoreConfig) -> Result<()> {
    let mut manager = open_manager(config)?;

    match manager.logout() {
        Some(saved) if manager.status() == STATUS_LOGGED_OUT => {
            println!("{} {}", "✓ Logged out".green(), saved);
        }
        Some(saved) => {
            println!("{} {}", "✓ Removed saved session".green(), saved);
        }
        None => println!("{}", "No saved session".yellow()),
    }
    println!("  Status: {}", manager.status());

    Ok(())
}
