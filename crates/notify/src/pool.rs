// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::NotificationError;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, info, info_span};

/// A delivery ready to run. It owns everything it needs.
pub type DeliveryTask = BoxFuture<'static, ()>;

/// Runs delivery tasks on behalf of the dispatcher.
pub trait TaskExecutor: Send + Sync {
    /// Queues `task` without waiting for it to finish.
    fn submit(&self, task: DeliveryTask) -> Result<(), NotificationError>;

    /// Stops accepting tasks. Running tasks are not awaited.
    fn shutdown(&self);

    fn is_shutdown(&self) -> bool;
}

/// Fixed-size pool of delivery workers on a tokio runtime.
///
/// Each submitted task is spawned immediately and waits for one of
/// `worker_count` permits before it runs, so a slow destination holds at
/// most one worker.
pub struct WorkerPool {
    runtime: Handle,
    workers: Arc<Semaphore>,
    worker_count: usize,
    closed: AtomicBool,
}

impl WorkerPool {
    /// Creates a pool on the current tokio runtime.
    pub fn new(worker_count: usize) -> Result<Self, NotificationError> {
        let runtime = Handle::try_current().map_err(|e| NotificationError::RuntimeUnavailable(e.to_string()))?;
        Ok(Self::with_runtime(runtime, worker_count))
    }

    pub fn with_runtime(runtime: Handle, worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        info!("Starting notification worker pool with {} workers", worker_count);
        Self {
            runtime,
            workers: Arc::new(Semaphore::new(worker_count)),
            worker_count,
            closed: AtomicBool::new(false),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Workers not currently running a delivery.
    pub fn idle_workers(&self) -> usize {
        self.workers.available_permits()
    }
}

impl TaskExecutor for WorkerPool {
    fn submit(&self, task: DeliveryTask) -> Result<(), NotificationError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(NotificationError::PoolShutdown);
        }
        let workers = self.workers.clone();
        self.runtime.spawn(
            async move {
                let _permit = match workers.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        debug!("Worker pool closed, dropping queued delivery");
                        return;
                    }
                };
                task.await;
            }
            .instrument(info_span!("s3_ev")),
        );
        Ok(())
    }

    fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.workers.close();
            info!("Notification worker pool shut down");
        }
    }

    fn is_shutdown(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Runs each task to completion inside `submit`.
///
/// Deliveries become synchronous, which makes dispatch deterministic in tests.
/// Tasks must not need the calling thread's tokio runtime to make progress.
#[derive(Debug, Default)]
pub struct InlineExecutor {
    closed: AtomicBool,
}

impl InlineExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskExecutor for InlineExecutor {
    fn submit(&self, task: DeliveryTask) -> Result<(), NotificationError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(NotificationError::PoolShutdown);
        }
        futures::executor::block_on(task);
        Ok(())
    }

    fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn is_shutdown(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
