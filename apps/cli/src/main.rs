//! vcsession CLI - saved vCenter sessions from the command line
//!
//! Provides a `vcsession` command that logs in to a vCenter endpoint,
//! remembers who and where (never the password), and resumes or ends that
//! session later.

mod commands;
mod config;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, shells};
use colored::Colorize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vcsession_core::SessionStoreConfig;

use commands::{clear_session, login, logout, resume, status};
use config::CliConfig;

/// vcsession - Persistent vCenter sessions
///
/// Logs in against the vSphere REST API and keeps the session identity in
/// `~/.vmware/vcenter_session.json`. Set VMWARE_SESSION_KEY (base64, 32 bytes)
/// or VMWARE_SESSION_PASSPHRASE to encrypt the saved file.
#[derive(Parser, Debug)]
#[command(name = "vcsession", author, version, about = "Persistent vCenter sessions")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Session file (overrides VMWARE_SESSION_FILE)
    #[arg(short = 'f', long, global = true)]
    session_file: Option<PathBuf>,

    /// Config file with login defaults (defaults to ~/.vcsession/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and save the session
    ///
    /// Prompts for the password unless --password is given. The password is
    /// never written to disk.
    Login {
        /// Login name (e.g. administrator@vsphere.local)
        #[arg(short, long)]
        username: Option<String>,

        /// vCenter host name or address
        #[arg(long)]
        host: Option<String>,

        /// HTTPS port [default: 443]
        #[arg(short, long)]
        port: Option<u16>,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// End the saved session and delete it
    Logout,

    /// Show the saved session
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in again as the saved user, prompting for the password
    Resume,

    /// Delete the saved session and its salt file
    ClearSession,
}

fn parse_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn main() -> anyhow::Result<()> {
    // Handle completion generation
    #[allow(clippy::disallowed_methods)]
    let completions = std::env::var("VCSESSION_GENERATE_COMPLETIONS");
    if let Ok(shell) = completions {
        let mut cmd = Args::command();
        match shell.as_str() {
            "bash" => generate(shells::Bash, &mut cmd, "vcsession", &mut std::io::stdout()),
            "zsh" => generate(shells::Zsh, &mut cmd, "vcsession", &mut std::io::stdout()),
            "fish" => generate(shells::Fish, &mut cmd, "vcsession", &mut std::io::stdout()),
            "powershell" => generate(shells::PowerShell, &mut cmd, "vcsession", &mut std::io::stdout()),
            "elvish" => generate(shells::Elvish, &mut cmd, "vcsession", &mut std::io::stdout()),
            _ => {
                eprintln!("Unknown shell: {}. Supported: bash, zsh, fish, powershell, elvish", shell);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let args = Args::parse();

    let cli_config = match CliConfig::discover(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Warning:".yellow(), e);
            CliConfig::default()
        }
    };

    let level = args
        .log_level
        .as_deref()
        .or(cli_config.log_level.as_deref())
        .map_or(Level::WARN, parse_level);

    // Logs go to stderr so `status --json` stays parseable.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut store_config = SessionStoreConfig::from_env();
    if let Some(path) = args.session_file {
        store_config = store_config.with_session_file(path);
    }

    match args.command {
        Command::Login { username, host, port, password } => {
            let request = login::LoginArgs {
                username: username.or(cli_config.username),
                host: host.or(cli_config.host),
                port: port.or(cli_config.port),
                password,
            };
            login::execute(&store_config, request)
        }
        Command::Logout => logout::execute(&store_config),
        Command::Status { json } => status::execute(&store_config, json),
        Command::Resume => resume::execute(&store_config),
        Command::ClearSession => clear_session::execute(&store_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("nonsense"), Level::WARN);
    }

    #[test]
    fn test_parse_login_args() {
        let args = Args::parse_from([
            "vcsession", "--session-file", "/tmp/s.json", "login", "-u", "admin", "--host", "vc.example",
        ]);
        assert_eq!(args.session_file, Some(PathBuf::from("/tmp/s.json")));
        match args.command {
            Command::Login { username, host, port, password } => {
                assert_eq!(username.as_deref(), Some("admin"));
                assert_eq!(host.as_deref(), Some("vc.example"));
                assert_eq!(port, None);
                assert_eq!(password, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
