//! Domain types and validators for nodescale configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use nodescale_common::command::EXECUTABLE;

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "cluster.kube_master_ip",
    "cluster.executable",
    "azure.nodeup_script",
    "azure.nodedown_script",
    "azure.reassign_script",
    "azure.terminate_script",
    "executor.workers",
    "executor.timeout_secs",
    "regions_file",
    "credentials_file",
    "preferences_file",
    "preferences_reload_secs",
];

pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_RELOAD_SECS: u64 = 30;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.nodescale/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodescaleConfig {
    /// Cluster-wide settings shared by every provider.
    pub cluster: ClusterConfig,
    /// Azure lifecycle scripts. The Azure provider is only registered when
    /// this section is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureScripts>,
    pub executor: ExecutorConfig,
    /// YAML list of region records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions_file: Option<PathBuf>,
    /// YAML map of region id to credentials; re-read on every lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,
    /// YAML file of cluster preferences (hot-reloaded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences_file: Option<PathBuf>,
    /// Poll interval of the preference watcher, in seconds.
    pub preferences_reload_secs: u64,
}

/// Kubernetes join settings, identical for every node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub kube_master_ip: String,
    pub kubeadm_token: String,
    /// Interpreter used to launch lifecycle scripts.
    pub executable: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kube_master_ip: String::new(),
            kubeadm_token: String::new(),
            executable: EXECUTABLE.to_string(),
        }
    }
}

/// Script paths of the Azure provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AzureScripts {
    pub nodeup_script: String,
    pub nodedown_script: String,
    pub reassign_script: String,
    pub terminate_script: String,
}

/// Worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub workers: usize,
    pub timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for NodescaleConfig {
    fn default() -> Self {
        Self {
            cluster: ClusterConfig::default(),
            azure: None,
            executor: ExecutorConfig::default(),
            regions_file: None,
            credentials_file: None,
            preferences_file: None,
            preferences_reload_secs: DEFAULT_RELOAD_SECS,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Look up a whitelisted key as a display string. `None` when unset.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn config_value(config: &NodescaleConfig, key: &str) -> Result<Option<String>> {
    validate_config_key(key)?;
    let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
    let azure = config.azure.as_ref();
    Ok(match key {
        "cluster.kube_master_ip" => Some(config.cluster.kube_master_ip.clone()),
        "cluster.executable" => Some(config.cluster.executable.clone()),
        "azure.nodeup_script" => azure.map(|a| a.nodeup_script.clone()),
        "azure.nodedown_script" => azure.map(|a| a.nodedown_script.clone()),
        "azure.reassign_script" => azure.map(|a| a.reassign_script.clone()),
        "azure.terminate_script" => azure.map(|a| a.terminate_script.clone()),
        "executor.workers" => Some(config.executor.workers.to_string()),
        "executor.timeout_secs" => Some(config.executor.timeout_secs.to_string()),
        "regions_file" => path(&config.regions_file),
        "credentials_file" => path(&config.credentials_file),
        "preferences_file" => path(&config.preferences_file),
        "preferences_reload_secs" => Some(config.preferences_reload_secs.to_string()),
        _ => None,
    })
}

/// Collect every problem that would make a scaling call fail at build time.
///
/// Returns an empty list for a usable configuration.
#[must_use]
pub fn config_problems(config: &NodescaleConfig) -> Vec<String> {
    let mut problems = Vec::new();
    let cluster = &config.cluster;
    check_set(&mut problems, "cluster.kube_master_ip", &cluster.kube_master_ip);
    check_set(&mut problems, "cluster.kubeadm_token", &cluster.kubeadm_token);
    check_set(&mut problems, "cluster.executable", &cluster.executable);
    match &config.azure {
        Some(azure) => {
            check_set(&mut problems, "azure.nodeup_script", &azure.nodeup_script);
            check_set(&mut problems, "azure.nodedown_script", &azure.nodedown_script);
            check_set(&mut problems, "azure.reassign_script", &azure.reassign_script);
            check_set(&mut problems, "azure.terminate_script", &azure.terminate_script);
        }
        None => problems.push("no provider section (azure) is configured".to_string()),
    }
    if config.executor.workers == 0 {
        problems.push("executor.workers must be at least 1".to_string());
    }
    if config.executor.timeout_secs == 0 {
        problems.push("executor.timeout_secs must be at least 1".to_string());
    }
    if config.regions_file.is_none() {
        problems.push("regions_file is not set".to_string());
    }
    problems
}

fn check_set(problems: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        problems.push(format!("{name} is not set"));
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
