//! Integration tests for the `stride` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `stride` binary with env isolation.
///
/// Clears all `STRIDE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn stride_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("stride");
    cmd.env("HOME", "/tmp/stride-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/stride-cli-test-nonexistent")
        .env_remove("STRIDE_PROFILE")
        .env_remove("STRIDE_SERVER")
        .env_remove("STRIDE_API_TOKEN")
        .env_remove("STRIDE_TOKEN")
        .env_remove("STRIDE_OUTPUT")
        .env_remove("STRIDE_INSECURE")
        .env_remove("STRIDE_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = stride_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    stride_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("running club")
            .and(predicate::str::contains("members"))
            .and(predicate::str::contains("records"))
            .and(predicate::str::contains("groups")),
    );
}

#[test]
fn test_version_flag() {
    stride_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stride"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    stride_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    stride_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    stride_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = stride_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_members_list_no_server() {
    let output = stride_cmd().args(["members", "list"]).output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure without server config"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("config")
            || text.contains("Configuration")
            || text.contains("server")
            || text.contains("profile"),
        "Expected error about missing configuration:\n{text}"
    );
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    stride_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_prints_something() {
    stride_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_output_format() {
    let output = stride_cmd()
        .args(["--output", "invalid", "members", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing server config, not about argument parsing.
    let output = stride_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "members",
            "list",
        ])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure without server config"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("config")
            || text.contains("Configuration")
            || text.contains("server")
            || text.contains("profile"),
        "Expected error about missing configuration:\n{text}"
    );
}

#[test]
fn test_config_use_unknown_profile() {
    let output = stride_cmd()
        .args(["config", "use", "ghost"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for unknown profile"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("ghost") || text.contains("profile"),
        "Expected error naming the unknown profile:\n{text}"
    );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_members_subcommands_exist() {
    stride_cmd()
        .args(["members", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("freeze"))
                .and(predicate::str::contains("activate"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_records_subcommands_exist() {
    stride_cmd()
        .args(["records", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("verify"))
                .and(predicate::str::contains("delete")),
        );
}

#[test]
fn test_groups_subcommands_exist() {
    stride_cmd()
        .args(["groups", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list").and(predicate::str::contains("create")));
}

#[test]
fn test_config_subcommands_exist() {
    stride_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles")),
        );
}

#[test]
fn test_short_aliases_resolve() {
    // `m`, `r`, and `g` alias the entity subcommands.
    stride_cmd()
        .args(["m", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"));
    stride_cmd()
        .args(["g", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"));
}
