//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared
//! `nodescale_common` types — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use nodescale_common::{CloudCredentials, CloudRegion, EnvVars, RegionId, ScalingError};

use crate::domain::{ClusterPreferences, NodescaleConfig};

// ── Region Registry Port ──────────────────────────────────────────────────────

/// Read access to region records and their credentials.
///
/// The scaling core never writes through this port.
pub trait RegionRegistry: Send + Sync {
    /// Resolve a region reference to its provider-specific record.
    fn find_region(&self, id: RegionId) -> Result<CloudRegion, ScalingError>;

    /// Load the current credentials of a region.
    ///
    /// Called once per request; implementations must not serve a cached
    /// copy because credentials may rotate.
    fn load_credentials(&self, id: RegionId) -> Result<CloudCredentials, ScalingError>;
}

// ── Preference Port ───────────────────────────────────────────────────────────

/// Source of cluster-wide preference snapshots.
///
/// Each scaling decision takes a fresh snapshot; a slightly stale value is
/// acceptable because the next decision re-reads it.
pub trait PreferenceSource: Send + Sync {
    fn snapshot(&self) -> Arc<ClusterPreferences>;
}

// ── Process Execution Port ────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Object-safe and `Send` so that dispatched tasks can own an
/// `Arc<dyn ProcessExecutor>` across threads.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Run `program` with `args`, overlaying `env` on the inherited
    /// environment, and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// executor's timeout. On timeout the child must be killed.
    async fn run(&self, program: &str, args: &[String], env: &EnvVars) -> Result<Output>;
}

// ── Task Queue Port ───────────────────────────────────────────────────────────

/// A zero-argument unit of work.
pub type Task = BoxFuture<'static, ()>;

/// Bounded parallel execution service.
pub trait TaskQueue: Send + Sync {
    /// Schedule `task` and return immediately. Nothing is reported back.
    fn submit(&self, task: Task);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading of the nodescale configuration file.
pub trait ConfigStore {
    /// Load the configuration, or defaults when no file exists.
    fn load(&self) -> Result<NodescaleConfig>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
