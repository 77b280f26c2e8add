use std::sync::Arc;

use coop_core::{Timer, WorkItem};
use coop_queue::WorkQueue;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::PoolError;
use crate::event::{emit, PoolEvent, Reporter};
use crate::session::{Connector, HttpConnector};
use crate::stats::RunReport;
use crate::worker::{Registry, WorkerId};

use super::task::WorkerTask;

/// Pool whose workers run as concurrently scheduled tokio tasks.
///
/// Which worker gets which item depends on when each task resumes; the queue
/// still guarantees every item is handed to exactly one worker.
pub struct EventLoopPool<C: Connector = HttpConnector> {
    queue: Arc<WorkQueue<WorkItem>>,
    registry: Registry,
    connector: Arc<C>,
    reporter: Arc<dyn Reporter>,
}

impl<C: Connector> EventLoopPool<C> {
    pub fn new(connector: C, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            queue: Arc::new(WorkQueue::new()),
            registry: Registry::default(),
            connector: Arc::new(connector),
            reporter,
        }
    }

    /// Append items to the queue. The queue is only sealed by [`run`](Self::run),
    /// which consumes the pool, so this cannot fail in practice.
    pub fn enqueue_all<I>(&mut self, items: I) -> Result<usize, PoolError>
    where
        I: IntoIterator<Item = WorkItem>,
    {
        let added = self.queue.extend(items)?;
        debug!(added, queued = self.queue.len(), "items enqueued");
        Ok(added)
    }

    /// Register a worker; its task is spawned when the run starts.
    pub fn spawn_worker(&mut self, name: &str) -> Result<WorkerId, PoolError> {
        let id = self.registry.register(name)?;
        info!(worker = name, %id, "registered worker");
        Ok(id)
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Spawn every worker and wait for all of them.
    ///
    /// The first failing worker aborts the others; its error is returned once
    /// the aborted tasks have been torn down.
    pub async fn run(self) -> Result<RunReport, PoolError> {
        if self.registry.is_empty() && !self.queue.is_empty() {
            return Err(PoolError::NoWorkers(self.queue.len()));
        }
        self.queue.seal();
        info!(
            workers = self.registry.len(),
            items = self.queue.len(),
            "event-loop run starting"
        );

        let mut timer = Timer::started();
        let mut set = JoinSet::new();
        for (id, name) in self.registry.into_workers() {
            let task = WorkerTask {
                id,
                name,
                queue: Arc::clone(&self.queue),
                connector: Arc::clone(&self.connector),
                reporter: Arc::clone(&self.reporter),
            };
            set.spawn(task.run());
        }

        let mut finished = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            match joined? {
                Ok(stats) => finished.push(stats),
                Err(e) => {
                    warn!(
                        error = %e,
                        remaining = set.len(),
                        popped = self.queue.popped(),
                        enqueued = self.queue.enqueued(),
                        "worker failed, aborting run"
                    );
                    set.shutdown().await;
                    return Err(e);
                }
            }
        }

        let elapsed = timer.stop()?;
        emit(self.reporter.as_ref(), PoolEvent::TotalElapsed { elapsed });
        info!(
            enqueued = self.queue.enqueued(),
            popped = self.queue.popped(),
            "event-loop run finished"
        );

        finished.sort_by_key(|w| w.id);
        Ok(RunReport { elapsed, workers: finished })
    }
}
