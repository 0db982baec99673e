//! `nodescale terminate` — destroy a node and its cloud resources.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use nodescale_common::RegionId;

use crate::app::AppContext;
use crate::commands::{Lifecycle, execute};
use crate::domain::Operation;

#[derive(Args)]
pub struct TerminateArgs {
    /// Region id from the regions file
    #[arg(long)]
    pub region: u64,

    /// Run identifier of the node
    #[arg(long)]
    pub run_id: String,

    /// Print the rendered command without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the terminate command.
pub async fn run(app: &AppContext, args: TerminateArgs) -> Result<ExitCode> {
    let stack = app.scaling_stack()?;
    let region = RegionId(args.region);
    let label = args.run_id.as_str();
    let lifecycle = Lifecycle {
        op: Operation::Terminate,
        region,
        node_label: label,
    };
    execute(
        app,
        &stack,
        &lifecycle,
        args.dry_run,
        |s| s.service.render_terminate(region, label),
        |s| s.service.terminate_node(region, label),
    )
    .await
}
