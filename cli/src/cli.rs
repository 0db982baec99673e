//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::infra::logging;

/// Bring cluster nodes up and down through provider lifecycle scripts
#[derive(Parser)]
#[command(
    name = "nodescale",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Config file (default: ~/.nodescale/config.yaml)
    #[arg(long, global = true, env = "NODESCALE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Bring up a node for a run
    Up(commands::up::UpArgs),

    /// Release a run's node, or a pool node with --pool
    Down(commands::down::DownArgs),

    /// Move a node from one run to another
    Reassign(commands::reassign::ReassignArgs),

    /// Destroy a node and its cloud resources
    Terminate(commands::terminate::TerminateArgs),

    /// Print environment variables of a region
    #[command(subcommand)]
    Env(commands::env::EnvCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            command,
        } = self;

        let ansi = !no_color && console::Term::stderr().is_term();
        logging::init(if quiet { "warn" } else { "info" }, ansi);

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
        });

        match command {
            Command::Up(args) => commands::up::run(&app, args).await,
            Command::Down(args) => commands::down::run(&app, args).await,
            Command::Reassign(args) => commands::reassign::run(&app, args).await,
            Command::Terminate(args) => commands::terminate::run(&app, args).await,
            Command::Env(cmd) => commands::env::run(&app, &cmd),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
