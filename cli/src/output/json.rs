//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed JSON document
//! on stdout; logs stay on stderr.

use anyhow::{Context, Result};
use serde::Serialize;

use nodescale_common::{EnvVars, RegionId};

use crate::domain::NodescaleConfig;
use crate::output::OperationReport;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders command results as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_operation(&self, report: &OperationReport) -> Result<()> {
        print_json(report)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_pool_reclaim(&self, region: RegionId, node_label: &str) -> Result<()> {
        print_json(&serde_json::json!({
            "op": "down",
            "pool": true,
            "region": region,
            "node_label": node_label,
            "status": "requested",
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_env(&self, env: &EnvVars) -> Result<()> {
        print_json(env)
    }

    /// The token is never echoed; only whether it is set.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &NodescaleConfig, path: &std::path::Path) -> Result<()> {
        let mut value = serde_json::to_value(config).context("JSON serialization failed")?;
        if let Some(cluster) = value.get_mut("cluster").and_then(|c| c.as_object_mut()) {
            let set = !config.cluster.kubeadm_token.is_empty();
            cluster.insert(
                "kubeadm_token".to_string(),
                serde_json::Value::String(if set { "(set)" } else { "(not set)" }.to_string()),
            );
        }
        print_json(&serde_json::json!({
            "path": path,
            "config": value,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_validation(&self, path: &std::path::Path, problems: &[String]) -> Result<()> {
        print_json(&serde_json::json!({
            "path": path,
            "valid": problems.is_empty(),
            "problems": problems,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_value(&self, key: &str, value: Option<&str>) -> Result<()> {
        print_json(&serde_json::json!({ "key": key, "value": value }))
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}
