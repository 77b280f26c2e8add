use coop_core::{Timer, WorkItem};
use coop_queue::WorkQueue;
use tokio::time::Instant;
use tracing::debug;

use crate::error::WorkError;
use crate::event::{emit, PoolEvent, Reporter};
use crate::session::{BlockingConnector, BlockingSession};
use crate::stats::WorkerStats;
use crate::worker::WorkerId;

/// Outcome of one resumption of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The worker did one unit of work and gave control back.
    Yielded,
    /// The worker found the queue empty and is finished.
    Complete,
}

/// Everything a step may touch besides the worker's own state.
pub struct StepContext<'a, C: BlockingConnector> {
    pub queue: &'a WorkQueue<WorkItem>,
    pub connector: &'a C,
    pub reporter: &'a dyn Reporter,
}

#[derive(Debug)]
enum State {
    Idle,
    Counting { seq: usize, target: u64, total: u64 },
    Done,
}

/// A named worker driven one step at a time.
///
/// Each step pops at most one item. A count advances by one increment per
/// step; a delay or fetch runs to completion inside a single step.
pub struct CooperativeWorker<C: BlockingConnector> {
    name: String,
    state: State,
    session: Option<C::Session>,
    timer: Timer,
    born: Option<Instant>,
    stats: WorkerStats,
}

impl<C: BlockingConnector> CooperativeWorker<C> {
    pub fn new(id: WorkerId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            stats: WorkerStats::new(id, name.clone()),
            name,
            state: State::Idle,
            session: None,
            timer: Timer::new(),
            born: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_stats(self) -> WorkerStats {
        self.stats
    }

    /// Resume the worker for exactly one step.
    ///
    /// An error retires the worker: later steps return [`Step::Complete`]
    /// without popping, so no further item is taken from the queue.
    pub fn step(&mut self, ctx: &StepContext<'_, C>) -> Result<Step, WorkError> {
        let outcome = self.advance(ctx);
        if outcome.is_err() {
            debug!(worker = %self.name, "step failed, retiring worker");
            self.state = State::Done;
            self.session = None;
            self.timer = Timer::new();
        }
        outcome
    }

    fn advance(&mut self, ctx: &StepContext<'_, C>) -> Result<Step, WorkError> {
        let born = *self.born.get_or_insert_with(Instant::now);

        loop {
            match &mut self.state {
                State::Done => return Ok(Step::Complete),
                State::Counting { seq, target, total } => {
                    if *total < *target {
                        *total += 1;
                        return Ok(Step::Yielded);
                    }
                    let (seq, total) = (*seq, *total);
                    let elapsed = self.timer.stop()?;
                    self.stats.record(seq, elapsed);
                    self.state = State::Idle;
                    emit(ctx.reporter, PoolEvent::Counted { worker: self.name.clone(), total });
                }
                State::Idle => {
                    let Some(ticket) = ctx.queue.pop() else {
                        self.state = State::Done;
                        self.session = None;
                        self.stats.lifetime = born.elapsed();
                        debug!(worker = %self.name, items = self.stats.consumed.len(), "queue empty, worker complete");
                        return Ok(Step::Complete);
                    };
                    debug!(worker = %self.name, seq = ticket.seq, item = %ticket.item, "popped");

                    match ticket.item {
                        WorkItem::Count(target) => {
                            emit(ctx.reporter, PoolEvent::Running { worker: self.name.clone() });
                            self.timer.start()?;
                            self.state = State::Counting { seq: ticket.seq, target, total: 0 };
                        }
                        WorkItem::Delay(delay) => {
                            emit(ctx.reporter, PoolEvent::Running { worker: self.name.clone() });
                            self.timer.start()?;
                            std::thread::sleep(delay);
                            self.finish_unit(ctx, ticket.seq)?;
                            return Ok(Step::Yielded);
                        }
                        WorkItem::Url(url) => {
                            emit(
                                ctx.reporter,
                                PoolEvent::Fetching { worker: self.name.clone(), url: url.clone() },
                            );
                            let mut session = match self.session.take() {
                                Some(session) => session,
                                None => ctx.connector.open()?,
                            };
                            self.timer.start()?;
                            let fetched = session.get(&url);
                            self.session = Some(session);
                            fetched?;
                            self.finish_unit(ctx, ticket.seq)?;
                            return Ok(Step::Yielded);
                        }
                    }
                }
            }
        }
    }

    fn finish_unit(&mut self, ctx: &StepContext<'_, C>, seq: usize) -> Result<(), WorkError> {
        let elapsed = self.timer.stop()?;
        self.stats.record(seq, elapsed);
        emit(ctx.reporter, PoolEvent::Elapsed { worker: self.name.clone(), elapsed });
        Ok(())
    }
}
