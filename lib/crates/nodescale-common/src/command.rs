//! Cluster command model and renderer.
//!
//! Each builder collects typed fields and renders an immutable
//! [`RenderedCommand`]: an executable marker, the script path, then
//! `--flag value` pairs in a fixed order that the target scripts parse.
//! Building never performs I/O.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ScalingError;
use crate::types::EnvVars;

/// Default interpreter used to launch cluster scripts.
pub const EXECUTABLE: &str = "python";

/// A fully rendered command, ready to hand to a process executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCommand {
    executable: String,
    argv: Vec<String>,
    environment: EnvVars,
}

impl RenderedCommand {
    /// The executable marker, e.g. `python`.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.executable
    }

    /// Arguments after the executable; the script path comes first.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.argv
    }

    #[must_use]
    pub fn script(&self) -> &str {
        self.argv.first().map_or("", String::as_str)
    }

    /// Script-context environment overlay.
    #[must_use]
    pub fn env(&self) -> &EnvVars {
        &self.environment
    }

    /// The value following the first `--name` token.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flag_values(name).into_iter().next()
    }

    /// Every value following a `--name` token, in order.
    #[must_use]
    pub fn flag_values(&self, name: &str) -> Vec<&str> {
        let token = format!("--{name}");
        self.argv
            .windows(2)
            .filter(|pair| pair[0] == token)
            .map(|pair| pair[1].as_str())
            .collect()
    }

    /// `true` when a bare `--name` token is present.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        let token = format!("--{name}");
        self.argv.iter().any(|arg| *arg == token)
    }

    /// Single-string form: tokens joined by one space.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.executable.as_str())
            .chain(self.argv.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn required(field: &'static str, value: &str) -> Result<(), ScalingError> {
    if value.trim().is_empty() {
        return Err(ScalingError::MissingField { field });
    }
    Ok(())
}

fn push_flag(argv: &mut Vec<String>, name: &str, value: &str) {
    argv.push(format!("--{name}"));
    argv.push(value.to_string());
}

// ── Node up ──────────────────────────────────────────────────────────────────

/// Builder for the node-up command.
#[derive(Debug, Clone, Default)]
pub struct NodeUpCommand {
    executable: String,
    script: String,
    run_id: String,
    ssh_key: String,
    instance_image: String,
    instance_type: String,
    instance_disk: String,
    kube_ip: String,
    kube_token: String,
    region: String,
    pre_pulled_images: Vec<String>,
    additional_labels: BTreeMap<String, String>,
    is_spot: bool,
    env: EnvVars,
}

impl NodeUpCommand {
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn executable(mut self, value: impl Into<String>) -> Self {
        self.executable = value.into();
        self
    }

    #[must_use]
    pub fn script(mut self, value: impl Into<String>) -> Self {
        self.script = value.into();
        self
    }

    #[must_use]
    pub fn run_id(mut self, value: impl Into<String>) -> Self {
        self.run_id = value.into();
        self
    }

    #[must_use]
    pub fn ssh_key(mut self, value: impl Into<String>) -> Self {
        self.ssh_key = value.into();
        self
    }

    #[must_use]
    pub fn instance_image(mut self, value: impl Into<String>) -> Self {
        self.instance_image = value.into();
        self
    }

    #[must_use]
    pub fn instance_type(mut self, value: impl Into<String>) -> Self {
        self.instance_type = value.into();
        self
    }

    /// Disk size, already serialized: it travels as a CLI token.
    #[must_use]
    pub fn instance_disk(mut self, value: impl Into<String>) -> Self {
        self.instance_disk = value.into();
        self
    }

    #[must_use]
    pub fn kube_ip(mut self, value: impl Into<String>) -> Self {
        self.kube_ip = value.into();
        self
    }

    #[must_use]
    pub fn kube_token(mut self, value: impl Into<String>) -> Self {
        self.kube_token = value.into();
        self
    }

    #[must_use]
    pub fn region(mut self, value: impl Into<String>) -> Self {
        self.region = value.into();
        self
    }

    #[must_use]
    pub fn pre_pulled_images(mut self, images: impl IntoIterator<Item = String>) -> Self {
        self.pre_pulled_images = images.into_iter().collect();
        self
    }

    #[must_use]
    pub fn additional_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.additional_labels = labels;
        self
    }

    #[must_use]
    pub fn is_spot(mut self, value: bool) -> Self {
        self.is_spot = value;
        self
    }

    #[must_use]
    pub fn env(mut self, env: EnvVars) -> Self {
        self.env = env;
        self
    }

    /// Validate and render.
    pub fn build(self) -> Result<RenderedCommand, ScalingError> {
        required("executable", &self.executable)?;
        required("script", &self.script)?;
        required("run id", &self.run_id)?;
        required("ssh key path", &self.ssh_key)?;
        required("instance image", &self.instance_image)?;
        required("instance type", &self.instance_type)?;
        required("instance disk", &self.instance_disk)?;
        required("kube master ip", &self.kube_ip)?;
        required("kube token", &self.kube_token)?;
        required("region code", &self.region)?;
        if let Some(position) = self.pre_pulled_images.iter().position(|i| i.trim().is_empty()) {
            return Err(ScalingError::Configuration(format!(
                "pre-pulled image #{} is blank",
                position + 1
            )));
        }
        for key in self.additional_labels.keys() {
            if key.trim().is_empty() || key.contains('=') {
                return Err(ScalingError::Configuration(format!(
                    "invalid node label key '{key}'"
                )));
            }
        }

        let mut argv = vec![self.script];
        push_flag(&mut argv, "run_id", &self.run_id);
        push_flag(&mut argv, "ins_key", &self.ssh_key);
        push_flag(&mut argv, "ins_img", &self.instance_image);
        push_flag(&mut argv, "ins_type", &self.instance_type);
        push_flag(&mut argv, "ins_hdd", &self.instance_disk);
        push_flag(&mut argv, "kube_ip", &self.kube_ip);
        push_flag(&mut argv, "kubeadm_token", &self.kube_token);
        push_flag(&mut argv, "region_id", &self.region);
        if self.is_spot {
            push_flag(&mut argv, "is_spot", "true");
        }
        for image in &self.pre_pulled_images {
            push_flag(&mut argv, "image", image);
        }
        for (key, value) in &self.additional_labels {
            push_flag(&mut argv, "label", &format!("{key}={value}"));
        }

        Ok(RenderedCommand {
            executable: self.executable,
            argv,
            environment: self.env,
        })
    }
}

// ── Run-id commands (down / terminate) ───────────────────────────────────────

/// Builder for commands that carry only a run identifier: node down and
/// node terminate.
#[derive(Debug, Clone, Default)]
pub struct RunIdArgCommand {
    executable: String,
    script: String,
    run_id: String,
    env: EnvVars,
}

impl RunIdArgCommand {
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn executable(mut self, value: impl Into<String>) -> Self {
        self.executable = value.into();
        self
    }

    #[must_use]
    pub fn script(mut self, value: impl Into<String>) -> Self {
        self.script = value.into();
        self
    }

    #[must_use]
    pub fn run_id(mut self, value: impl Into<String>) -> Self {
        self.run_id = value.into();
        self
    }

    #[must_use]
    pub fn env(mut self, env: EnvVars) -> Self {
        self.env = env;
        self
    }

    pub fn build(self) -> Result<RenderedCommand, ScalingError> {
        required("executable", &self.executable)?;
        required("script", &self.script)?;
        required("run id", &self.run_id)?;

        let mut argv = vec![self.script];
        push_flag(&mut argv, "run_id", &self.run_id);
        Ok(RenderedCommand {
            executable: self.executable,
            argv,
            environment: self.env,
        })
    }
}

// ── Reassign ─────────────────────────────────────────────────────────────────

/// Builder for moving a labelled node from one run to another.
#[derive(Debug, Clone, Default)]
pub struct ReassignCommand {
    executable: String,
    script: String,
    old_id: String,
    new_id: String,
    env: EnvVars,
}

impl ReassignCommand {
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn executable(mut self, value: impl Into<String>) -> Self {
        self.executable = value.into();
        self
    }

    #[must_use]
    pub fn script(mut self, value: impl Into<String>) -> Self {
        self.script = value.into();
        self
    }

    #[must_use]
    pub fn old_id(mut self, value: impl Into<String>) -> Self {
        self.old_id = value.into();
        self
    }

    #[must_use]
    pub fn new_id(mut self, value: impl Into<String>) -> Self {
        self.new_id = value.into();
        self
    }

    #[must_use]
    pub fn env(mut self, env: EnvVars) -> Self {
        self.env = env;
        self
    }

    pub fn build(self) -> Result<RenderedCommand, ScalingError> {
        required("executable", &self.executable)?;
        required("script", &self.script)?;
        required("old run id", &self.old_id)?;
        required("new run id", &self.new_id)?;

        let mut argv = vec![self.script];
        push_flag(&mut argv, "old_id", &self.old_id);
        push_flag(&mut argv, "new_id", &self.new_id);
        Ok(RenderedCommand {
            executable: self.executable,
            argv,
            environment: self.env,
        })
    }
}
