//! Login command implementation.

use anyhow::{Result, anyhow};
use colored::Colorize;
use vcsession_core::SessionStoreConfig;
use vcsession_core::session::DEFAULT_PORT;
use zeroize::Zeroizing;

use super::{describe_save, open_manager, prompt_password};

/// Login parameters after config-file defaults are applied.
#[derive(Debug, Default)]
pub struct LoginArgs {
    pub username: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub password: Option<String>,
}

/// Executes the login command.
pub fn execute(config: &SessionStoreConfig, args: LoginArgs) -> Result<()> {
    let username = args
        .username
        .ok_or_else(|| anyhow!("No username given (use --username or set username in the config file)"))?;
    let host = args
        .host
        .ok_or_else(|| anyhow!("No host given (use --host or set host in the config file)"))?;
    let port = args.port.unwrap_or(DEFAULT_PORT);

    let password = match args.password {
        Some(password) => Zeroizing::new(password),
        None => prompt_password(&format!("Password for {}@{}: ", username, host))?,
    };

    let mut manager = open_manager(config)?;
    manager.login(&username, &password, &host, port)?;

    println!("{} {}@{}:{}", "✓ Logged in as".green(), username, host, port);
    println!(
        "  Session saved to {} ({})",
        manager.store().path().display(),
        describe_save(manager.last_save())
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_login_requires_host() {
        let temp_dir = TempDir::new().unwrap();
        let config = SessionStoreConfig::new().with_session_file(temp_dir.path().join("s.json"));
        let args = LoginArgs {
            username: Some("admin".to_string()),
            password: Some("pw".to_string()),
            ..LoginArgs::default()
        };

        let err = execute(&config, args).unwrap_err();
        assert!(err.to_string().contains("No host given"));
    }
}
