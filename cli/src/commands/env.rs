//! `nodescale env` — print the environment a region's scripts or containers
//! would receive.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use nodescale_common::RegionId;

use crate::app::AppContext;
use crate::output::Renderer;

#[derive(Subcommand)]
pub enum EnvCommand {
    /// Variables handed to lifecycle scripts
    Script {
        /// Region id from the regions file
        #[arg(long)]
        region: u64,
    },
    /// Variables exposing the region's cloud identity to a container
    Container {
        /// Region id from the regions file
        #[arg(long)]
        region: u64,
    },
}

/// Run the env command.
pub fn run(app: &AppContext, cmd: &EnvCommand) -> Result<ExitCode> {
    let stack = app.scaling_stack()?;
    let env = match *cmd {
        EnvCommand::Script { region } => stack.service.script_env_vars(RegionId(region))?,
        EnvCommand::Container { region } => stack.service.container_env_vars(RegionId(region))?,
    };
    match app.renderer() {
        Renderer::Human(r) => r.render_env(&env),
        Renderer::Json(r) => r.render_env(&env)?,
    }
    Ok(ExitCode::SUCCESS)
}
