//! Queue error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was sealed when draining began and cannot be repopulated.
    #[error("queue is sealed: {0} item(s) rejected")]
    Sealed(usize),
}
