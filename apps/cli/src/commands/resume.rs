//! Resume command implementation.

use anyhow::Result;
use colored::Colorize;
use vcsession_core::SessionStoreConfig;

use super::{open_manager, prompt_password};

/// Logs in again as the saved user after prompting for the password.
pub fn execute(config: &SessionStoreConfig) -> Result<()> {
    let mut manager = open_manager(config)?;

    let resumed = manager.resume(|saved| prompt_password(&format!("Password for {}: ", saved)))?;

    println!("{} {}", "✓ Resumed session".green(), resumed);
    println!("  Status: {}", manager.status());

    Ok(())
}
