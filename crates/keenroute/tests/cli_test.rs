//! Integration tests for the `keenroute` CLI binary.
//!
//! These tests cover argument parsing, help output, shell completions,
//! config handling and local file validation without a live router.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `keenroute` binary with env isolation.
///
/// Clears all `KEENETIC_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn keenroute_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("keenroute");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("KEENETIC_HOST")
        .env_remove("KEENETIC_USER")
        .env_remove("KEENETIC_PASSWORD")
        .env_remove("KEENETIC_TIMEOUT");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = keenroute_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    keenroute_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("upload")
                .and(predicate::str::contains("backup"))
                .and(predicate::str::contains("clear"))
                .and(predicate::str::contains("resolve")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    keenroute_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("keenroute"));
}

#[test]
fn test_upload_requires_file_flag() {
    let home = tempfile::tempdir().unwrap();
    keenroute_cmd(home.path())
        .arg("upload")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--file"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    keenroute_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Local file handling ─────────────────────────────────────────────

#[test]
fn test_upload_missing_file_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    keenroute_cmd(home.path())
        .args(["upload", "-f"])
        .arg(home.path().join("absent.yaml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Routes file not found"));
}

#[test]
fn test_upload_empty_file_sends_nothing() {
    let home = tempfile::tempdir().unwrap();
    let file = write(home.path(), "routes.yaml", "routes:\n  - gateway: 10.0.0.1\n    hosts: []\n");
    keenroute_cmd(home.path())
        .args(["upload", "-f"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries to upload."));
}

#[test]
fn test_upload_invalid_group_fails_before_login() {
    let home = tempfile::tempdir().unwrap();
    let file = write(
        home.path(),
        "routes.yaml",
        "routes:\n  - comment: vpn\n    gateway: 10.0.0.1\n    interface: Wireguard0\n    hosts: [1.1.1.1]\n",
    );
    keenroute_cmd(home.path())
        .args(["upload", "-f"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exactly one of"));
}

#[test]
fn test_upload_ipv6_host_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let file = write(
        home.path(),
        "routes.yaml",
        "routes:\n  - interface: Wireguard0\n    hosts: [\"2001:db8::1\"]\n",
    );
    keenroute_cmd(home.path())
        .args(["upload", "-f"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("IPv6"));
}

#[test]
fn test_upload_without_config_names_missing_field() {
    let home = tempfile::tempdir().unwrap();
    let file = write(
        home.path(),
        "routes.yaml",
        "routes:\n  - interface: Wireguard0\n    hosts: [1.1.1.1]\n",
    );
    keenroute_cmd(home.path())
        .args(["upload", "-f"])
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("host is required"));
}

#[test]
fn test_resolve_without_domains() {
    let home = tempfile::tempdir().unwrap();
    let file = write(
        home.path(),
        "routes.yaml",
        "routes:\n  - interface: Wireguard0\n    hosts: [1.1.1.1]\n",
    );
    keenroute_cmd(home.path())
        .args(["resolve", "-f"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("No domains to resolve."));
}

#[test]
fn test_resolve_literal_address_updates_file() {
    let home = tempfile::tempdir().unwrap();
    let file = write(
        home.path(),
        "routes.yaml",
        "routes:\n  - comment: dns\n    interface: Wireguard0\n    domains: [9.9.9.9]\n",
    );
    keenroute_cmd(home.path())
        .args(["resolve", "-f"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 1 domains in 1 groups, added 1 IPs."));

    let updated = std::fs::read_to_string(&file).unwrap();
    assert!(updated.contains("9.9.9.9"));
    assert!(updated.contains("hosts:"));
}

// ── Confirmation and config ─────────────────────────────────────────

#[test]
fn test_clear_requires_yes_when_not_interactive() {
    let home = tempfile::tempdir().unwrap();
    keenroute_cmd(home.path())
        .arg("clear")
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

#[test]
fn test_config_show_masks_password_and_applies_env() {
    let home = tempfile::tempdir().unwrap();
    keenroute_cmd(home.path())
        .env("KEENETIC_HOST", "192.168.100.1:280")
        .env("KEENETIC_PASSWORD", "hunter2")
        .args(["config", "show", "--user", "flaguser"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("host = \"192.168.100.1:280\"")
                .and(predicate::str::contains("user = \"flaguser\""))
                .and(predicate::str::contains("password = \"****\""))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_path_prints_location() {
    let home = tempfile::tempdir().unwrap();
    keenroute_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
