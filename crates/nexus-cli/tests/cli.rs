use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with its config file isolated in a temp dir.
fn nexus(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nexus").unwrap();
    cmd.env("NEXUS_CONFIG", dir.path().join("config.toml"))
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    nexus(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("dns"));
}

#[test]
fn lookup_requires_a_target() {
    let dir = TempDir::new().unwrap();
    nexus(&dir).arg("lookup").assert().failure();
}

#[test]
fn empty_lookup_fails_with_error_body() {
    let dir = TempDir::new().unwrap();
    nexus(&dir)
        .args(["lookup", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Empty input"));
}

#[test]
fn invalid_lookup_json_output() {
    let dir = TempDir::new().unwrap();
    nexus(&dir)
        .args(["--output", "json", "lookup", "256.1.1.1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\": \"Invalid URL\""));
}

#[test]
fn multiple_bad_targets_reported_together() {
    let dir = TempDir::new().unwrap();
    nexus(&dir)
        .args(["-o", "json", "lookup", "", "http://"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Empty input"))
        .stdout(predicate::str::contains("Invalid URL"))
        .stderr(predicate::str::contains("2 of 2 lookups failed"));
}

#[test]
fn config_set_then_show() {
    let dir = TempDir::new().unwrap();

    nexus(&dir)
        .args(["config", "set", "port_timeout_ms", "300"])
        .assert()
        .success();

    nexus(&dir)
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port_timeout_ms\": 300"));

    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("port_timeout_ms = 300"));
}

#[test]
fn config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    nexus(&dir)
        .args(["config", "set", "api_key", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn config_path_honors_override() {
    let dir = TempDir::new().unwrap();
    nexus(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn scan_local_closed_ports() {
    let dir = TempDir::new().unwrap();
    nexus(&dir)
        .args(["-o", "json", "scan", "127.0.0.1", "-p", "9", "-t", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scannedPorts\""));
}
