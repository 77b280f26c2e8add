//! Event-loop-managed task set.
//!
//! Every worker is a tokio task that loops pop → work → pop until the queue
//! is empty. The driver spawns them into a [`tokio::task::JoinSet`] and waits
//! for the whole group. Run it on a current-thread runtime to get
//! single-threaded cooperative scheduling.

mod pool;
mod task;

pub use self::pool::EventLoopPool;
