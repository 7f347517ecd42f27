//! Integration tests for the `vcsession` session commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A `vcsession` command isolated to `temp_dir`: its own HOME and no session
/// key material from the outer environment.
fn vcsession(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vcsession").unwrap();
    cmd.env("HOME", temp_dir.path())
        .env_remove("VMWARE_SESSION_FILE")
        .env_remove("VMWARE_SESSION_KEY")
        .env_remove("VMWARE_SESSION_PASSPHRASE")
        .env_remove("VCSESSION_GENERATE_COMPLETIONS");
    cmd
}

fn session_file(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("vcenter_session.json")
}

fn write_plaintext_session(path: &Path) {
    std::fs::write(
        path,
        r#"{"username":"admin","host":"vc.example","port":8443,"timestamp":123}"#,
    )
    .unwrap();
}

#[test]
fn test_clear_session_twice() {
    let temp_dir = TempDir::new().unwrap();
    let path = session_file(&temp_dir);
    write_plaintext_session(&path);

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(&path)
        .arg("clear-session")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared saved session"));
    assert!(!path.exists());

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(&path)
        .arg("clear-session")
        .assert()
        .success();
}

#[test]
fn test_status_without_session() {
    let temp_dir = TempDir::new().unwrap();

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(session_file(&temp_dir))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("none"));
}

#[test]
fn test_status_shows_plaintext_session() {
    let temp_dir = TempDir::new().unwrap();
    let path = session_file(&temp_dir);
    write_plaintext_session(&path);

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(&path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("admin@vc.example:8443"));
}

#[test]
fn test_status_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = session_file(&temp_dir);
    write_plaintext_session(&path);

    let assert = vcsession(&temp_dir)
        .arg("--session-file")
        .arg(&path)
        .arg("status")
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("status --json output should be valid JSON");
    assert_eq!(json["saved"]["host"], "vc.example");
    assert_eq!(json["saved"]["port"], 8443);
    assert_eq!(json["encrypted"], false);
}

#[test]
fn test_status_json_hides_session_token() {
    let temp_dir = TempDir::new().unwrap();
    let path = session_file(&temp_dir);
    std::fs::write(
        &path,
        r#"{"username":"admin","host":"vc.example","port":443,"timestamp":1,"cookie":"live-token-123"}"#,
    )
    .unwrap();

    let assert = vcsession(&temp_dir)
        .arg("--session-file")
        .arg(&path)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("live-token-123").not());

    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["saved"]["token"], true);
}

#[test]
fn test_status_with_mistyped_key_reads_plaintext() {
    let temp_dir = TempDir::new().unwrap();
    let path = session_file(&temp_dir);
    write_plaintext_session(&path);

    vcsession(&temp_dir)
        .env("VMWARE_SESSION_KEY", "bm9wZQ==")
        .arg("--session-file")
        .arg(&path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("admin@vc.example:8443"));
}

#[test]
fn test_session_file_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("from-env.json");
    write_plaintext_session(&path);

    vcsession(&temp_dir)
        .env("VMWARE_SESSION_FILE", &path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("from-env.json"))
        .stdout(predicate::str::contains("admin@vc.example:8443"));
}

#[test]
fn test_resume_without_session() {
    let temp_dir = TempDir::new().unwrap();

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(session_file(&temp_dir))
        .arg("resume")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No saved session"));
}

#[test]
fn test_login_unreachable_host() {
    let temp_dir = TempDir::new().unwrap();
    let path = session_file(&temp_dir);

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(&path)
        .args(["login", "--username", "admin", "--host", "127.0.0.1", "--port", "1"])
        .args(["--password", "hunter2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Login failed"));

    assert!(!path.exists());
}

#[test]
fn test_login_without_host() {
    let temp_dir = TempDir::new().unwrap();

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(session_file(&temp_dir))
        .args(["login", "--username", "admin", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No host given"));
}

#[test]
fn test_login_host_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "host = \"127.0.0.1\"\nport = 1\nusername = \"admin\"\n").unwrap();

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(session_file(&temp_dir))
        .arg("--config")
        .arg(&config)
        .args(["login", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Login failed"));
}

#[test]
fn test_logout_removes_session() {
    let temp_dir = TempDir::new().unwrap();
    let path = session_file(&temp_dir);
    write_plaintext_session(&path);

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(&path)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed saved session"))
        .stdout(predicate::str::contains("Disconnected"));

    assert!(!path.exists());
}

#[test]
fn test_logout_without_session() {
    let temp_dir = TempDir::new().unwrap();

    vcsession(&temp_dir)
        .arg("--session-file")
        .arg(session_file(&temp_dir))
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved session"));
}

#[test]
fn test_generate_completions() {
    let temp_dir = TempDir::new().unwrap();

    vcsession(&temp_dir)
        .env("VCSESSION_GENERATE_COMPLETIONS", "bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("vcsession"));
}
