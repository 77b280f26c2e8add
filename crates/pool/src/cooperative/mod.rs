//! Cooperative manual stepping.
//!
//! Split into focused submodules:
//! - `worker`: the per-worker state machine advanced by [`CooperativeWorker::step`]
//! - `pool`: registration and the round-robin driver loop

mod pool;
mod worker;

pub use self::pool::CooperativePool;
pub use self::worker::{CooperativeWorker, Step, StepContext};
