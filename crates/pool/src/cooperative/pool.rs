use std::sync::Arc;

use coop_core::{Timer, WorkItem};
use coop_queue::WorkQueue;
use tracing::{debug, info};

use crate::error::PoolError;
use crate::event::{emit, PoolEvent, Reporter};
use crate::session::{BlockingConnector, HttpConnector};
use crate::stats::RunReport;
use crate::worker::{Registry, WorkerId};

use super::worker::{CooperativeWorker, Step, StepContext};

/// Single-threaded pool whose workers are resumed round-robin, one step each.
///
/// Only one step runs at a time, so the interleaving is a pure function of
/// the queued items and the registration order of the workers.
pub struct CooperativePool<C: BlockingConnector = HttpConnector> {
    queue: WorkQueue<WorkItem>,
    registry: Registry,
    connector: C,
    reporter: Arc<dyn Reporter>,
}

impl<C: BlockingConnector> CooperativePool<C> {
    pub fn new(connector: C, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            queue: WorkQueue::new(),
            registry: Registry::default(),
            connector,
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

    /// Register a worker. Workers are resumed in registration order.
    pub fn spawn_worker(&mut self, name: &str) -> Result<WorkerId, PoolError> {
        let id = self.registry.register(name)?;
        info!(worker = name, %id, "registered worker");
        Ok(id)
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Drive every worker until the queue is drained and all have completed.
    ///
    /// The first work error aborts the run.
    pub fn run(self) -> Result<RunReport, PoolError> {
        if self.registry.is_empty() && !self.queue.is_empty() {
            return Err(PoolError::NoWorkers(self.queue.len()));
        }
        self.queue.seal();
        info!(
            workers = self.registry.len(),
            items = self.queue.len(),
            "cooperative run starting"
        );

        let mut timer = Timer::started();
        let ctx = StepContext {
            queue: &self.queue,
            connector: &self.connector,
            reporter: self.reporter.as_ref(),
        };

        let mut live: Vec<CooperativeWorker<C>> = self
            .registry
            .into_workers()
            .map(|(id, name)| CooperativeWorker::new(id, name))
            .collect();
        let mut finished = Vec::with_capacity(live.len());
        let mut steps = 0u64;

        while !live.is_empty() {
            let mut i = 0;
            while i < live.len() {
                let outcome = live[i].step(&ctx).map_err(|source| PoolError::Worker {
                    worker: live[i].name().to_string(),
                    source,
                })?;
                steps += 1;
                match outcome {
                    Step::Yielded => i += 1,
                    Step::Complete => finished.push(live.remove(i).into_stats()),
                }
            }
        }

        let elapsed = timer.stop()?;
        emit(ctx.reporter, PoolEvent::TotalElapsed { elapsed });
        info!(
            steps,
            enqueued = self.queue.enqueued(),
            popped = self.queue.popped(),
            "cooperative run finished"
        );

        finished.sort_by_key(|w| w.id);
        Ok(RunReport { elapsed, workers: finished })
    }
}
