//! `nodescale down` — release a node.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use nodescale_common::RegionId;

use crate::app::AppContext;
use crate::commands::{EXIT_INTERRUPTED, Lifecycle, drain, execute};
use crate::domain::Operation;
use crate::output::Renderer;

#[derive(Args)]
pub struct DownArgs {
    /// Region id from the regions file
    #[arg(long)]
    pub region: u64,

    /// Run identifier of the node
    #[arg(long)]
    pub run_id: String,

    /// Reclaim a pool node: best-effort, failures are only logged
    #[arg(long)]
    pub pool: bool,

    /// Print the rendered command without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the down command.
pub async fn run(app: &AppContext, args: DownArgs) -> Result<ExitCode> {
    let stack = app.scaling_stack()?;
    let region = RegionId(args.region);
    let label = args.run_id.as_str();

    if args.pool && !args.dry_run {
        stack.service.scale_down_pool_node(region, label);
        match app.renderer() {
            Renderer::Human(r) => r.render_pool_reclaim(region, label),
            Renderer::Json(r) => r.render_pool_reclaim(region, label)?,
        }
        if !drain(app, &stack).await {
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let lifecycle = Lifecycle {
        op: Operation::Down,
        region,
        node_label: label,
    };
    execute(
        app,
        &stack,
        &lifecycle,
        args.dry_run,
        |s| s.service.render_down(region, label),
        |s| s.service.scale_down_node(region, label),
    )
    .await
}
