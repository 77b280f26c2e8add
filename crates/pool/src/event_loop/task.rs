use std::sync::Arc;

use coop_core::{Timer, WorkItem};
use coop_queue::WorkQueue;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{PoolError, WorkError};
use crate::event::{emit, PoolEvent, Reporter};
use crate::session::{Connector, Session};
use crate::stats::WorkerStats;
use crate::worker::WorkerId;

/// Everything one worker task owns or shares.
pub(super) struct WorkerTask<C: Connector> {
    pub(super) id: WorkerId,
    pub(super) name: String,
    pub(super) queue: Arc<WorkQueue<WorkItem>>,
    pub(super) connector: Arc<C>,
    pub(super) reporter: Arc<dyn Reporter>,
}

impl<C: Connector> WorkerTask<C> {
    pub(super) async fn run(self) -> Result<WorkerStats, PoolError> {
        let name = self.name.clone();
        self.drain().await.map_err(|source| PoolError::Worker { worker: name, source })
    }

    async fn drain(self) -> Result<WorkerStats, WorkError> {
        let born = Instant::now();
        let mut stats = WorkerStats::new(self.id, self.name.clone());
        let mut timer = Timer::new();
        let mut session: Option<C::Session> = None;

        while let Some(ticket) = self.queue.pop() {
            debug!(worker = %self.name, seq = ticket.seq, item = %ticket.item, "popped");
            match ticket.item {
                WorkItem::Count(target) => {
                    self.report(PoolEvent::Running { worker: self.name.clone() });
                    timer.start()?;
                    let mut total = 0u64;
                    for _ in 0..target {
                        total += 1;
                        tokio::task::yield_now().await;
                    }
                    stats.record(ticket.seq, timer.stop()?);
                    self.report(PoolEvent::Counted { worker: self.name.clone(), total });
                }
                WorkItem::Delay(delay) => {
                    self.report(PoolEvent::Running { worker: self.name.clone() });
                    timer.start()?;
                    tokio::time::sleep(delay).await;
                    let elapsed = timer.stop()?;
                    stats.record(ticket.seq, elapsed);
                    self.report(PoolEvent::Elapsed { worker: self.name.clone(), elapsed });
                }
                WorkItem::Url(url) => {
                    self.report(PoolEvent::Fetching { worker: self.name.clone(), url: url.clone() });
                    let mut open = match session.take() {
                        Some(open) => open,
                        None => self.connector.connect()?,
                    };
                    timer.start()?;
                    let fetched = open.get(&url).await;
                    session = Some(open);
                    fetched?;
                    let elapsed = timer.stop()?;
                    stats.record(ticket.seq, elapsed);
                    self.report(PoolEvent::Elapsed { worker: self.name.clone(), elapsed });
                }
            }
        }

        stats.lifetime = born.elapsed();
        debug!(worker = %self.name, items = stats.consumed.len(), "queue empty, worker complete");
        Ok(stats)
    }

    fn report(&self, event: PoolEvent) {
        emit(self.reporter.as_ref(), event);
    }
}
