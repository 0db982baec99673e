//! `nodescale config` subcommands.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::{azure_workspace, nodescale, workspace};

#[test]
fn test_config_path_honours_flag() {
    let (_dir, config) = azure_workspace();
    nodescale()
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(config.display().to_string()));
}

#[test]
fn test_config_path_honours_env() {
    let (_dir, config) = azure_workspace();
    nodescale()
        .env("NODESCALE_CONFIG", &config)
        .args(["config", "path", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\": \"path\""));
}

#[test]
fn test_config_show_redacts_token() {
    let (_dir, config) = azure_workspace();
    nodescale()
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(set)"))
        .stdout(predicate::str::contains("/opt/scripts/nodeup.py"))
        .stdout(predicate::str::contains("abcdef.0123456789abcdef").not());
}

#[test]
fn test_config_show_json_redacts_token() {
    let (_dir, config) = azure_workspace();
    let output = nodescale()
        .arg("--config")
        .arg(&config)
        .args(["config", "show", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(v["config"]["cluster"]["kubeadm_token"], "(set)");
    assert_eq!(v["config"]["executor"]["workers"], 8);
}

#[test]
fn test_config_validate_passes_for_complete_config() {
    let (_dir, config) = azure_workspace();
    nodescale()
        .arg("--config")
        .arg(&config)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_validate_reports_missing_provider() {
    let (_dir, config) = workspace("");
    nodescale()
        .arg("--config")
        .arg(&config)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("azure"));
}

#[test]
fn test_config_validate_json_lists_problems() {
    let (_dir, config) = workspace("");
    let output = nodescale()
        .arg("--config")
        .arg(&config)
        .args(["config", "validate", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(v["valid"], false);
    assert!(
        v["problems"]
            .as_array()
            .expect("array")
            .iter()
            .any(|p| p.as_str().is_some_and(|p| p.contains("azure")))
    );
}

#[test]
fn test_config_get_reads_value() {
    let (_dir, config) = azure_workspace();
    nodescale()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "azure.nodedown_script"])
        .assert()
        .success()
        .stdout(predicate::str::diff("/opt/scripts/nodedown.py\n"));
}

#[test]
fn test_config_get_applies_env_override() {
    let (_dir, config) = azure_workspace();
    nodescale()
        .arg("--config")
        .arg(&config)
        .env("NODESCALE_WORKERS", "3")
        .args(["config", "get", "executor.workers"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));
}

#[test]
fn test_config_get_refuses_token() {
    let (_dir, config) = azure_workspace();
    nodescale()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "cluster.kubeadm_token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
}
