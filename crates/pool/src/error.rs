use coop_core::TimerError;
use coop_queue::QueueError;
use thiserror::Error;

/// Failure of a single work unit.
#[derive(Debug, Error)]
pub enum WorkError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GET {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("timer error: {0}")]
    Timer(#[from] TimerError),
}

#[derive(Debug, Error)]
pub enum PoolError {
    /// A worker hit a fatal error; the run was aborted.
    #[error("worker {worker} failed")]
    Worker {
        worker: String,
        #[source]
        source: WorkError,
    },

    #[error("duplicate worker name: {0}")]
    DuplicateWorker(String),

    #[error("{0} item(s) queued but no workers registered")]
    NoWorkers(usize),

    #[error("worker task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("timer error: {0}")]
    Timer(#[from] TimerError),
}

impl PoolError {
    /// Name of the worker that failed, if the error came from one.
    pub fn worker(&self) -> Option<&str> {
        match self {
            PoolError::Worker { worker, .. } => Some(worker),
            _ => None,
        }
    }
}
