//! Command implementations

pub mod config;
pub mod down;
pub mod env;
pub mod reassign;
pub mod terminate;
pub mod up;
pub mod version;

use std::process::ExitCode;

use anyhow::Result;
use nodescale_common::{RegionId, RenderedCommand, ScalingError};

use crate::app::{AppContext, ScalingStack};
use crate::application::services::Dispatched;
use crate::domain::Operation;
use crate::output::{OperationReport, OperationStatus, Renderer, progress};

/// Exit code when the user interrupts a drain.
pub(crate) const EXIT_INTERRUPTED: u8 = 130;

/// One lifecycle operation as seen by a command handler.
pub(crate) struct Lifecycle<'a> {
    pub op: Operation,
    pub region: RegionId,
    pub node_label: &'a str,
}

/// Render only, or dispatch, then report the command that was built.
///
/// After a dispatch the CLI waits for the worker pool to drain so the
/// process does not exit under a running script; Ctrl-C stops waiting.
pub(crate) async fn execute(
    app: &AppContext,
    stack: &ScalingStack,
    lifecycle: &Lifecycle<'_>,
    dry_run: bool,
    render: impl FnOnce(&ScalingStack) -> Result<RenderedCommand, ScalingError>,
    dispatch: impl FnOnce(&ScalingStack) -> Result<Dispatched, ScalingError>,
) -> Result<ExitCode> {
    let (status, command) = if dry_run {
        (OperationStatus::DryRun, render(stack)?)
    } else {
        let dispatched = dispatch(stack)?;
        (dispatched.status.into(), dispatched.command)
    };

    let report = OperationReport {
        op: lifecycle.op,
        region: lifecycle.region,
        node_label: lifecycle.node_label.to_string(),
        status,
        command,
    };
    render_report(app, &report)?;

    if status == OperationStatus::Submitted && !drain(app, stack).await {
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    Ok(ExitCode::SUCCESS)
}

fn render_report(app: &AppContext, report: &OperationReport) -> Result<()> {
    match app.renderer() {
        Renderer::Human(r) => r.render_operation(report),
        Renderer::Json(r) => r.render_operation(report)?,
    }
    Ok(())
}

/// Wait for dispatched work. Returns `false` if interrupted.
pub(crate) async fn drain(app: &AppContext, stack: &ScalingStack) -> bool {
    let spinner = (!app.is_json() && app.output.show_progress())
        .then(|| progress::spinner("Waiting for dispatched commands"));

    let finished = tokio::select! {
        () = stack.pool.wait_idle() => true,
        _ = tokio::signal::ctrl_c() => false,
    };

    if let Some(pb) = spinner {
        if finished {
            progress::finish_success(&pb, "Dispatched commands finished");
        } else {
            progress::finish_error(&pb, "Interrupted; running scripts were stopped");
        }
    }
    if !finished {
        tracing::warn!(pending = stack.pool.pending(), "interrupted before commands finished");
    }
    finished
}
