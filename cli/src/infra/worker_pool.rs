//! Bounded worker pool implementing the `TaskQueue` port.
//!
//! Tasks are spawned onto a tokio runtime immediately; a semaphore caps how
//! many run at once. Callers never wait on a task, but the CLI can drain the
//! pool before exiting with [`WorkerPool::wait_idle`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio::sync::{Notify, Semaphore};

use crate::application::ports::{Task, TaskQueue};

pub struct WorkerPool {
    handle: Handle,
    permits: Arc<Semaphore>,
    workers: usize,
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl WorkerPool {
    /// A pool of `workers` slots on `handle`. Zero is raised to one.
    #[must_use]
    pub fn new(workers: usize, handle: Handle) -> Self {
        let workers = workers.max(1);
        Self {
            handle,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
            pending: Arc::new(AtomicUsize::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    /// A pool on the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn current(workers: usize) -> Result<Self> {
        let handle = Handle::try_current().context("worker pool needs a tokio runtime")?;
        Ok(Self::new(workers, handle))
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Tasks submitted and not yet finished, queued or running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Resolve once every submitted task has finished.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl TaskQueue for WorkerPool {
    fn submit(&self, task: Task) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let done = Done {
            pending: Arc::clone(&self.pending),
            idle: Arc::clone(&self.idle),
        };
        let permits = Arc::clone(&self.permits);
        self.handle.spawn(async move {
            let _done = done;
            // The semaphore is never closed.
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            task.await;
        });
    }
}

/// Marks one task finished, including when it panics.
struct Done {
    pending: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl Drop for Done {
    fn drop(&mut self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}
