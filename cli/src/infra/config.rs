//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::ConfigStore;
use crate::domain::config::NodescaleConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "NODESCALE_CONFIG";

/// Prefix of environment overrides, e.g. `NODESCALE_WORKERS`.
pub const ENV_PREFIX: &str = "NODESCALE_";

/// Settings that may be overridden from the environment via `envy`:
///   - `NODESCALE_WORKERS`
///   - `NODESCALE_TIMEOUT_SECS`
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct EnvOverrides {
    pub workers: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .with_context(|| format!("invalid {ENV_PREFIX}* environment override"))
    }

    pub fn apply(&self, config: &mut NodescaleConfig) {
        if let Some(workers) = self.workers {
            config.executor.workers = workers;
        }
        if let Some(timeout) = self.timeout_secs {
            config.executor.timeout_secs = timeout;
        }
    }
}

/// YAML config file on disk, `~/.nodescale/config.yaml` by default.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// A store reading a fixed file instead of the default location.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Parse the file without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_file(&self) -> Result<NodescaleConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(NodescaleConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let mut config: NodescaleConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        if let Some(base) = path.parent() {
            resolve_relative_paths(&mut config, base);
        }
        Ok(config)
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<NodescaleConfig> {
        let mut config = self.load_file()?;
        EnvOverrides::from_env()?.apply(&mut config);
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".nodescale").join("config.yaml"))
    }
}

/// Data file paths in the config are relative to the config file.
fn resolve_relative_paths(config: &mut NodescaleConfig, base: &Path) {
    for path in [
        &mut config.regions_file,
        &mut config.credentials_file,
        &mut config.preferences_file,
    ]
    .into_iter()
    .flatten()
    {
        if path.is_relative() {
            *path = base.join(&*path);
        }
    }
}
