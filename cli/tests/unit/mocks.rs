//! Hand-written mocks of the application ports.

#![allow(dead_code)]

use std::collections::HashMap;
use std::process::Output;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use nodescale::application::ports::{ProcessExecutor, RegionRegistry, Task, TaskQueue};
use nodescale_common::{
    AzureRegionCredentials, CloudCredentials, CloudRegion, EnvVars, RegionId, ScalingError,
};

use crate::helpers::ok_output;

// ── Region registry ──────────────────────────────────────────────────────────

/// In-memory registry. Keys can be swapped between calls to model rotation.
#[derive(Default)]
pub struct InMemoryRegions {
    regions: Mutex<HashMap<RegionId, CloudRegion>>,
    keys: Mutex<HashMap<RegionId, String>>,
    credential_loads: AtomicUsize,
}

impl InMemoryRegions {
    pub fn insert(&self, region: CloudRegion) {
        self.regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(region.id(), region);
    }

    pub fn set_key(&self, id: RegionId, key: &str) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, key.to_string());
    }

    pub fn remove_key(&self, id: RegionId) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    pub fn credential_loads(&self) -> usize {
        self.credential_loads.load(Ordering::SeqCst)
    }
}

impl RegionRegistry for InMemoryRegions {
    fn find_region(&self, id: RegionId) -> Result<CloudRegion, ScalingError> {
        self.regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or_else(|| ScalingError::Configuration(format!("unknown region {id}")))
    }

    fn load_credentials(&self, id: RegionId) -> Result<CloudCredentials, ScalingError> {
        self.credential_loads.fetch_add(1, Ordering::SeqCst);
        let keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        let key = keys
            .get(&id)
            .ok_or_else(|| ScalingError::CredentialResolution {
                region: id,
                reason: "no credentials stored".to_string(),
            })?;
        Ok(CloudCredentials::Azure(AzureRegionCredentials {
            storage_account_key: key.clone(),
        }))
    }
}

// ── Process executor ─────────────────────────────────────────────────────────

/// One recorded `ProcessExecutor::run` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    pub program: String,
    pub args: Vec<String>,
    pub env: EnvVars,
}

enum Reply {
    Output(Output),
    Error(String),
}

/// Records every call and answers with a fixed reply.
pub struct RecordingExecutor {
    calls: Mutex<Vec<RecordedRun>>,
    reply: Reply,
}

impl RecordingExecutor {
    /// Every run exits 0 with empty output.
    pub fn succeeding() -> Self {
        Self::with_output(ok_output(b""))
    }

    pub fn with_output(output: Output) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Reply::Output(output),
        }
    }

    /// Every run fails as if the process could not be spawned.
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Reply::Error(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedRun> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ProcessExecutor for RecordingExecutor {
    async fn run(&self, program: &str, args: &[String], env: &EnvVars) -> Result<Output> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRun {
                program: program.to_string(),
                args: args.to_vec(),
                env: env.clone(),
            });
        match &self.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::Error(message) => Err(anyhow!("{message}")),
        }
    }
}

// ── Task queue ───────────────────────────────────────────────────────────────

/// Holds submitted tasks until the test runs them.
#[derive(Default)]
pub struct ManualQueue {
    tasks: Mutex<Vec<Task>>,
}

impl ManualQueue {
    pub fn queued(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Run every queued task to completion, in submission order.
    pub async fn run_all(&self) {
        let tasks: Vec<Task> = std::mem::take(
            &mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for task in tasks {
            task.await;
        }
    }
}

impl TaskQueue for ManualQueue {
    fn submit(&self, task: Task) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task);
    }
}
