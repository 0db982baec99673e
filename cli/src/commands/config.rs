//! `nodescale config` — show and check configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::domain::ConfigError;
use crate::domain::config::{config_problems, config_value};
use crate::output::Renderer;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Print the config file location
    Path,
    /// Check that every required setting is present
    Validate,
    /// Print one configuration value
    Get {
        /// Configuration key, e.g. executor.workers
        key: String,
    },
}

/// Run the config command.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Path => show_path(app),
        ConfigCommand::Validate => validate(app),
        ConfigCommand::Get { key } => get_value(app, &key),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    let path = app.config_store.path()?;
    match app.renderer() {
        Renderer::Human(r) => r.render_config(&config, &path),
        Renderer::Json(r) => r.render_config(&config, &path)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn show_path(app: &AppContext) -> Result<ExitCode> {
    let path = app.config_store.path()?;
    let shown = path.display().to_string();
    match app.renderer() {
        Renderer::Human(r) => r.render_value(Some(&shown)),
        Renderer::Json(r) => r.render_value("path", Some(&shown))?,
    }
    Ok(ExitCode::SUCCESS)
}

fn validate(app: &AppContext) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    let path = app.config_store.path()?;
    let problems = config_problems(&config);
    match app.renderer() {
        Renderer::Json(r) => {
            r.render_validation(&path, &problems)?;
            if !problems.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Renderer::Human(r) => {
            if !problems.is_empty() {
                return Err(ConfigError::Incomplete { problems }.into());
            }
            r.render_valid(&path);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn get_value(app: &AppContext, key: &str) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    let value = config_value(&config, key)?;
    match app.renderer() {
        Renderer::Human(r) => r.render_value(value.as_deref()),
        Renderer::Json(r) => r.render_value(key, value.as_deref())?,
    }
    Ok(ExitCode::SUCCESS)
}
