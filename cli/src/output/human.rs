//! Human-readable terminal renderer.

use std::path::Path;

use nodescale_common::{EnvVars, RegionId};
use owo_colors::OwoColorize as _;

use crate::domain::NodescaleConfig;
use crate::output::{OperationReport, OperationStatus, OutputContext};

/// Renders results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_operation(&self, report: &OperationReport) {
        let subject = format!(
            "{} {} in region {}",
            report.op, report.node_label, report.region
        );
        match report.status {
            OperationStatus::DryRun => {
                self.ctx.header(&format!("Dry run: {subject}"));
                self.render_command(report);
            }
            OperationStatus::Submitted => {
                self.ctx.success(&format!("Dispatched {subject}"));
                self.render_command(report);
            }
            OperationStatus::AlreadyInFlight => {
                self.ctx
                    .warn(&format!("Skipped {subject}: already in flight"));
            }
        }
    }

    pub fn render_pool_reclaim(&self, region: RegionId, node_label: &str) {
        self.ctx.success(&format!(
            "Requested reclaim of pool node {node_label} in region {region}"
        ));
    }

    fn render_command(&self, report: &OperationReport) {
        if self.ctx.quiet {
            return;
        }
        println!(
            "    {}",
            report.command.command_line().style(self.ctx.styles.command)
        );
        for (key, value) in report.command.env() {
            println!("    {}={value}", key.style(self.ctx.styles.dim));
        }
    }

    /// `KEY=value` lines, never styled, so the output can be sourced.
    pub fn render_env(&self, env: &EnvVars) {
        for (key, value) in env {
            println!("{key}={value}");
        }
    }

    pub fn render_config(&self, config: &NodescaleConfig, path: &Path) {
        if self.ctx.quiet {
            return;
        }
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {}", "Cluster:".style(self.ctx.styles.bold));
        row("kube_master_ip:", or_unset(&config.cluster.kube_master_ip));
        row(
            "kubeadm_token:",
            if config.cluster.kubeadm_token.is_empty() {
                "(not set)"
            } else {
                "(set)"
            },
        );
        row("executable:", &config.cluster.executable);

        println!("  {}", "Azure:".style(self.ctx.styles.bold));
        match &config.azure {
            Some(azure) => {
                row("nodeup_script:", or_unset(&azure.nodeup_script));
                row("nodedown_script:", or_unset(&azure.nodedown_script));
                row("reassign_script:", or_unset(&azure.reassign_script));
                row("terminate_script:", or_unset(&azure.terminate_script));
            }
            None => row("provider:", "(not registered)"),
        }

        println!("  {}", "Executor:".style(self.ctx.styles.bold));
        row("workers:", &config.executor.workers.to_string());
        row("timeout_secs:", &config.executor.timeout_secs.to_string());

        println!("  {}", "Data files:".style(self.ctx.styles.bold));
        row("regions_file:", &path_or_unset(config.regions_file.as_deref()));
        row(
            "credentials_file:",
            &path_or_unset(config.credentials_file.as_deref()),
        );
        row(
            "preferences_file:",
            &path_or_unset(config.preferences_file.as_deref()),
        );

        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["NODESCALE_CONFIG", "NODESCALE_WORKERS", "NODESCALE_TIMEOUT_SECS", "RUST_LOG"] {
            row(
                &format!("{var}:"),
                &std::env::var(var).unwrap_or_else(|_| "(not set)".to_string()),
            );
        }
        println!();
    }

    pub fn render_valid(&self, path: &Path) {
        self.ctx
            .success(&format!("Configuration is valid ({})", path.display()));
    }

    pub fn render_value(&self, value: Option<&str>) {
        println!("{}", value.unwrap_or(""));
    }
}

fn row(key: &str, value: &str) {
    println!("    {key:<20} {value}");
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn path_or_unset(path: Option<&Path>) -> String {
    path.map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
}
