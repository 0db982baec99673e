//! Application service — node scaling use-cases.
//!
//! Every public operation resolves the region, picks the provider registered
//! for it, renders the command synchronously and hands execution to the task
//! queue. Rendering failures surface to the caller; execution outcomes only
//! reach the log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nodescale_common::{CloudRegion, EnvVars, RegionId, RenderedCommand, ScalingError, ScalingRequest};
use tracing::{Instrument, error, info, info_span, warn};

use crate::application::ports::{ProcessExecutor, RegionRegistry, TaskQueue};
use crate::application::services::providers::ProviderRegistry;
use crate::domain::{InFlightKey, InFlightLedger, Operation};

/// What happened to a scaling request after its command was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Handed to the worker pool.
    Submitted,
    /// The same operation on the same node is still running; nothing queued.
    AlreadyInFlight,
}

/// The command a scaling call rendered, and what became of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub status: Dispatch,
    pub command: RenderedCommand,
}

/// Cloud-agnostic entry point for node lifecycle operations.
pub struct ScalingService {
    providers: Arc<ProviderRegistry>,
    regions: Arc<dyn RegionRegistry>,
    executor: Arc<dyn ProcessExecutor>,
    queue: Arc<dyn TaskQueue>,
    in_flight: Arc<Mutex<InFlightLedger>>,
}

impl ScalingService {
    #[must_use]
    pub fn new(
        providers: Arc<ProviderRegistry>,
        regions: Arc<dyn RegionRegistry>,
        executor: Arc<dyn ProcessExecutor>,
        queue: Arc<dyn TaskQueue>,
    ) -> Self {
        Self {
            providers,
            regions,
            executor,
            queue,
            in_flight: Arc::new(Mutex::new(InFlightLedger::default())),
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────────

    pub fn render_up(&self, request: &ScalingRequest) -> Result<RenderedCommand, ScalingError> {
        let region = self.regions.find_region(request.region)?;
        self.providers
            .for_region(&region)?
            .build_node_up_command(&region, request)
    }

    pub fn render_down(
        &self,
        region: RegionId,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        let region = self.regions.find_region(region)?;
        self.providers
            .for_region(&region)?
            .build_node_down_command(&region, node_label)
    }

    pub fn render_reassign(
        &self,
        region: RegionId,
        old_label: &str,
        new_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        let region = self.regions.find_region(region)?;
        self.providers
            .for_region(&region)?
            .build_reassign_command(&region, old_label, new_label)
    }

    pub fn render_terminate(
        &self,
        region: RegionId,
        node_label: &str,
    ) -> Result<RenderedCommand, ScalingError> {
        let region = self.regions.find_region(region)?;
        self.providers
            .for_region(&region)?
            .build_terminate_command(&region, node_label)
    }

    // ── Dispatch ────────────────────────────────────────────────────────────

    /// Request a new node. Returns once the command is queued.
    pub fn scale_up_node(&self, request: &ScalingRequest) -> Result<Dispatched, ScalingError> {
        let command = self.render_up(request)?;
        Ok(self.dispatch(request.region, &request.node_label, Operation::Up, command))
    }

    /// Release the node labelled `node_label`. Returns once the command is queued.
    pub fn scale_down_node(
        &self,
        region: RegionId,
        node_label: &str,
    ) -> Result<Dispatched, ScalingError> {
        let command = self.render_down(region, node_label)?;
        Ok(self.dispatch(region, node_label, Operation::Down, command))
    }

    /// Release a pool node. Build failures are logged, never returned.
    pub fn scale_down_pool_node(&self, region: RegionId, node_label: &str) {
        match self.scale_down_node(region, node_label) {
            Ok(_) => {}
            Err(e) => error!(
                region_id = %region,
                node_label,
                code = e.code(),
                "failed to scale down pool node: {e}"
            ),
        }
    }

    /// Move a node from one run to another.
    pub fn reassign_node(
        &self,
        region: RegionId,
        old_label: &str,
        new_label: &str,
    ) -> Result<Dispatched, ScalingError> {
        let command = self.render_reassign(region, old_label, new_label)?;
        Ok(self.dispatch(region, old_label, Operation::Reassign, command))
    }

    /// Destroy the node and its cloud resources.
    pub fn terminate_node(
        &self,
        region: RegionId,
        node_label: &str,
    ) -> Result<Dispatched, ScalingError> {
        let command = self.render_terminate(region, node_label)?;
        Ok(self.dispatch(region, node_label, Operation::Terminate, command))
    }

    // ── Environment ─────────────────────────────────────────────────────────

    /// Variables the lifecycle scripts of `region` run with.
    pub fn script_env_vars(&self, region: RegionId) -> Result<EnvVars, ScalingError> {
        let region = self.regions.find_region(region)?;
        Ok(self.providers.for_region(&region)?.build_script_env_vars(&region))
    }

    /// Variables exposing the cloud identity of `region` to a container.
    pub fn container_env_vars(&self, region: RegionId) -> Result<EnvVars, ScalingError> {
        let region = self.regions.find_region(region)?;
        self.providers
            .for_region(&region)?
            .build_container_cloud_env_vars(&region)
    }

    /// Look up a region record.
    pub fn region(&self, region: RegionId) -> Result<CloudRegion, ScalingError> {
        self.regions.find_region(region)
    }

    /// Number of operations currently claimed and not yet finished.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    fn dispatch(
        &self,
        region: RegionId,
        node_label: &str,
        op: Operation,
        command: RenderedCommand,
    ) -> Dispatched {
        let status = self.submit(region, node_label, op, command.clone());
        Dispatched { status, command }
    }

    fn submit(
        &self,
        region: RegionId,
        node_label: &str,
        op: Operation,
        command: RenderedCommand,
    ) -> Dispatch {
        let key = InFlightKey::new(region, node_label, op);
        if !lock(&self.in_flight).try_claim(key.clone()) {
            info!(region_id = %region, node_label, %op, "operation already in flight, skipping");
            return Dispatch::AlreadyInFlight;
        }

        let executor = Arc::clone(&self.executor);
        let release = Release {
            ledger: Arc::clone(&self.in_flight),
            key,
        };
        let span = info_span!("scale", region_id = %region, node_label, %op);
        info!(parent: &span, script = command.script(), "dispatching");

        self.queue.submit(Box::pin(
            async move {
                let _release = release;
                run_command(executor.as_ref(), &command).await;
            }
            .instrument(span),
        ));
        Dispatch::Submitted
    }
}

async fn run_command(executor: &dyn ProcessExecutor, command: &RenderedCommand) {
    match executor
        .run(command.program(), command.args(), command.env())
        .await
    {
        Ok(output) if output.status.success() => {
            info!("command finished");
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                exit_code = output.status.code(),
                stderr = %stderr.trim(),
                "command exited with failure"
            );
        }
        Err(e) => {
            let err = ScalingError::Execution {
                program: command.program().to_string(),
                reason: format!("{e:#}"),
            };
            error!(code = err.code(), "{err}");
        }
    }
}

/// Releases an in-flight claim when the task finishes or is dropped unrun.
struct Release {
    ledger: Arc<Mutex<InFlightLedger>>,
    key: InFlightKey,
}

impl Drop for Release {
    fn drop(&mut self) {
        lock(&self.ledger).release(&self.key);
    }
}

fn lock(ledger: &Mutex<InFlightLedger>) -> MutexGuard<'_, InFlightLedger> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}
