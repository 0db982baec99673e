//! `nodescale reassign` — hand a running node to another run.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use nodescale_common::RegionId;

use crate::app::AppContext;
use crate::commands::{Lifecycle, execute};
use crate::domain::Operation;

#[derive(Args)]
pub struct ReassignArgs {
    /// Region id from the regions file
    #[arg(long)]
    pub region: u64,

    /// Run the node is currently labelled with
    #[arg(long)]
    pub run_id: String,

    /// Run the node moves to
    #[arg(long)]
    pub new_run_id: String,

    /// Print the rendered command without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the reassign command.
pub async fn run(app: &AppContext, args: ReassignArgs) -> Result<ExitCode> {
    let stack = app.scaling_stack()?;
    let region = RegionId(args.region);
    let (old, new) = (args.run_id.as_str(), args.new_run_id.as_str());
    let lifecycle = Lifecycle {
        op: Operation::Reassign,
        region,
        node_label: old,
    };
    execute(
        app,
        &stack,
        &lifecycle,
        args.dry_run,
        |s| s.service.render_reassign(region, old, new),
        |s| s.service.reassign_node(region, old, new),
    )
    .await
}
