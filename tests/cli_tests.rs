//! CLI integration tests for clab-tools
//!
//! Covers argument parsing, selector validation, inventory handling, and
//! the offline subcommands (nodes, drivers). Nothing here talks to a real
//! device; run/config paths against unreachable hosts are exercised only
//! for their failure reporting.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn clab_tools_cmd() -> Command {
    let mut cmd = Command::cargo_bin("clab-tools").unwrap();
    cmd.env_remove("CLAB_TOOLS_INVENTORY")
        .env_remove("CLAB_TOOLS_CONFIG")
        .env("NO_COLOR", "1");
    cmd
}

fn create_test_inventory() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        r#"lab: testlab
nodes:
  - name: r1
    host: 127.0.0.1
    kind: juniper_vjunosrouter
    port: 1
  - name: r2
    host: 127.0.0.1
    kind: unknown_kind
"#
    )
    .unwrap();
    file
}

#[test]
fn test_help() {
    clab_tools_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("containerlab"));
}

#[test]
fn test_version() {
    clab_tools_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clab-tools"));
}

#[test]
fn test_run_requires_command() {
    clab_tools_cmd()
        .args(["run", "--all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--command"));
}

#[test]
fn test_run_requires_selector() {
    let inventory = create_test_inventory();
    clab_tools_cmd()
        .args(["run", "--command", "show version"])
        .arg("-i")
        .arg(inventory.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--node"));
}

#[test]
fn test_conflicting_selectors_rejected() {
    clab_tools_cmd()
        .args([
            "run",
            "--command",
            "show version",
            "--node",
            "r1",
            "--all",
        ])
        .assert()
        .failure();
}

#[test]
fn test_missing_inventory_is_usage_error() {
    clab_tools_cmd()
        .args(["nodes"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("inventory"));
}

#[test]
fn test_missing_config_file_is_config_error() {
    clab_tools_cmd()
        .args(["-c", "/nonexistent/clab-tools.yaml", "drivers"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_unknown_node_is_inventory_error() {
    let inventory = create_test_inventory();
    clab_tools_cmd()
        .args(["run", "--command", "show version", "--node", "ghost"])
        .arg("-i")
        .arg(inventory.path())
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_nodes_lists_inventory() {
    let inventory = create_test_inventory();
    clab_tools_cmd()
        .args(["nodes"])
        .arg("-i")
        .arg(inventory.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("r1"))
        .stdout(predicate::str::contains("juniper_vjunosrouter"));
}

#[test]
fn test_nodes_json_output() {
    let inventory = create_test_inventory();
    let output = clab_tools_cmd()
        .args(["nodes", "--output", "json"])
        .arg("-i")
        .arg(inventory.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    assert_eq!(parsed[0]["name"], "r1");
}

#[test]
fn test_drivers_shows_builtins() {
    clab_tools_cmd()
        .args(["drivers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("juniper"))
        .stdout(predicate::str::contains("juniper_vjunosrouter"));
}

#[test]
fn test_drivers_json_output() {
    let output = clab_tools_cmd()
        .args(["drivers", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed["vendors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v == "juniper"));
}

#[test]
fn test_run_with_no_driver_reports_device_failure() {
    let inventory = create_test_inventory();
    // r2 has an unknown kind; the run completes with a per-device failure
    clab_tools_cmd()
        .args(["run", "--command", "show version", "--node", "r2"])
        .arg("-i")
        .arg(inventory.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("No driver"));
}

#[test]
fn test_run_json_result_per_device() {
    let inventory = create_test_inventory();
    let output = clab_tools_cmd()
        .args([
            "run",
            "--command",
            "show version",
            "--node",
            "r2",
            "--output",
            "json",
        ])
        .arg("-i")
        .arg(inventory.path())
        .output()
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = parsed.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["device"], "r2");
    assert_ne!(results[0]["exit_code"], 0);
}

#[test]
fn test_config_requires_a_source() {
    let inventory = create_test_inventory();
    clab_tools_cmd()
        .args(["config", "--all"])
        .arg("-i")
        .arg(inventory.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn test_config_rejects_both_sources() {
    clab_tools_cmd()
        .args([
            "config",
            "--all",
            "--file",
            "local.conf",
            "--device-file",
            "/var/tmp/remote.conf",
        ])
        .assert()
        .failure();
}

#[test]
fn test_config_missing_local_file_fails_before_devices() {
    let inventory = create_test_inventory();
    clab_tools_cmd()
        .args(["config", "--all", "--file", "/nonexistent/lab.conf"])
        .arg("-i")
        .arg(inventory.path())
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_invalid_format_rejected() {
    clab_tools_cmd()
        .args([
            "config",
            "--all",
            "--file",
            "x.conf",
            "--format",
            "binary",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
