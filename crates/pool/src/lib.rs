//! Cooperative worker pools draining a shared work queue.
//!
//! Two scheduling models share the same surface (`enqueue_all`,
//! `spawn_worker`, `run`):
//!
//! - [`CooperativePool`]: single-threaded manual stepping. Each worker is a
//!   state machine advanced one step at a time by a round-robin driver, so the
//!   interleaving is fully deterministic.
//! - [`EventLoopPool`]: one tokio task per worker, joined through a
//!   [`tokio::task::JoinSet`]. Workers suspend on timed delays, network I/O
//!   and once per counted increment.

pub mod cooperative;
pub mod demo;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod session;
pub mod stats;
pub mod worker;

pub use cooperative::{CooperativePool, CooperativeWorker, Step};
pub use error::{PoolError, WorkError};
pub use event::{MemoryReporter, NullReporter, PoolEvent, Reporter, StdoutReporter};
pub use event_loop::EventLoopPool;
pub use session::{BlockingConnector, BlockingSession, Connector, HttpConnector, Session};
pub use stats::{RunReport, WorkerStats};
pub use worker::WorkerId;

pub use coop_core::{PoolConfig, WorkItem};
pub use coop_queue::{Ticket, WorkQueue};
