//! Application context — unified state passed to every command handler.
//!
//! `AppContext` carries the output settings and the config store. Commands
//! that touch the scaling core ask it for a [`ScalingStack`], which wires the
//! ports to their file- and process-backed implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::application::ports::{ConfigStore, PreferenceSource, RegionRegistry};
use crate::application::services::{ProviderRegistry, ScalingService};
use crate::domain::{ConfigError, NodescaleConfig};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::preferences::{FilePreferenceStore, StaticPreferences};
use crate::infra::regions::FileRegionRegistry;
use crate::infra::worker_pool::WorkerPool;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    /// Explicit config file, overriding the default location.
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    pub config_store: YamlConfigStore,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let config_store = flags
            .config
            .as_ref()
            .map_or_else(YamlConfigStore::default, |path| YamlConfigStore::at(path.clone()));

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Load configuration and build the scaling core on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config, region or preference files cannot be
    /// loaded, or when called outside a tokio runtime.
    pub fn scaling_stack(&self) -> Result<ScalingStack> {
        let config = self.config_store.load()?;
        ScalingStack::from_config(&config)
    }
}

/// The scaling core wired to production adapters.
pub struct ScalingStack {
    pub service: ScalingService,
    pub pool: Arc<WorkerPool>,
    watcher: Option<JoinHandle<()>>,
}

impl ScalingStack {
    /// # Errors
    ///
    /// Returns an error if the executor timeout is zero, a data file cannot
    /// be loaded, or no region file is configured.
    pub fn from_config(config: &NodescaleConfig) -> Result<Self> {
        if config.executor.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "executor.timeout_secs",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        let regions_file = config
            .regions_file
            .as_deref()
            .context("regions_file is not set in the configuration")?;
        let regions: Arc<dyn RegionRegistry> = Arc::new(FileRegionRegistry::load(
            regions_file,
            config.credentials_file.clone(),
        )?);

        let (preferences, watcher): (Arc<dyn PreferenceSource>, _) =
            match &config.preferences_file {
                Some(path) => {
                    let store = Arc::new(FilePreferenceStore::load(path)?);
                    let watcher = (config.preferences_reload_secs > 0).then(|| {
                        store.spawn_watcher(Duration::from_secs(config.preferences_reload_secs))
                    });
                    (store as Arc<dyn PreferenceSource>, watcher)
                }
                None => (
                    Arc::new(StaticPreferences::default()) as Arc<dyn PreferenceSource>,
                    None,
                ),
            };

        let providers = Arc::new(ProviderRegistry::from_config(config, &preferences, &regions));
        let executor = Arc::new(TokioCommandRunner::new(Duration::from_secs(
            config.executor.timeout_secs,
        )));
        let pool = Arc::new(WorkerPool::current(config.executor.workers)?);

        tracing::debug!(
            providers = ?providers.providers(),
            workers = pool.workers(),
            timeout_secs = config.executor.timeout_secs,
            "scaling stack ready"
        );

        let service = ScalingService::new(providers, regions, executor, Arc::clone(&pool) as _);
        Ok(Self {
            service,
            pool,
            watcher,
        })
    }
}

impl Drop for ScalingStack {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
    }
}
