//! Shared FIFO work queue.
//!
//! Populated once, sealed when draining starts, then popped until empty.
//! [`WorkQueue::pop`] is a single atomic pop-or-empty operation, so callers
//! never check emptiness and pop as two separate steps.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::trace;

use crate::error::QueueError;

/// An item handed to exactly one consumer, tagged with its insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket<T> {
    /// Zero-based position of the item in insertion order.
    pub seq: usize,
    pub item: T,
}

#[derive(Debug)]
struct Inner<T> {
    items: VecDeque<Ticket<T>>,
    next_seq: usize,
    sealed: bool,
}

/// Mutex-guarded FIFO shared by all workers of a pool.
#[derive(Debug)]
pub struct WorkQueue<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                next_seq: 0,
                sealed: false,
            }),
        }
    }

    // A panic while the lock is held cannot leave `Inner` half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one item, returning its sequence number.
    pub fn push(&self, item: T) -> Result<usize, QueueError> {
        let mut inner = self.lock();
        if inner.sealed {
            return Err(QueueError::Sealed(1));
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.items.push_back(Ticket { seq, item });
        Ok(seq)
    }

    /// Append items in order, returning how many were added. All-or-nothing:
    /// a sealed queue rejects the whole batch.
    pub fn extend<I>(&self, items: I) -> Result<usize, QueueError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut inner = self.lock();
        if inner.sealed {
            return Err(QueueError::Sealed(items.into_iter().count()));
        }
        let before = inner.items.len();
        for item in items {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.items.push_back(Ticket { seq, item });
        }
        Ok(inner.items.len() - before)
    }

    /// Forbid further pushes. Idempotent.
    pub fn seal(&self) {
        self.lock().sealed = true;
    }

    /// Remove the oldest item, or `None` once the queue is drained.
    pub fn pop(&self) -> Option<Ticket<T>> {
        let ticket = self.lock().items.pop_front();
        if let Some(ref t) = ticket {
            trace!(seq = t.seq, "popped");
        }
        ticket
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Total number of items ever enqueued.
    pub fn enqueued(&self) -> usize {
        self.lock().next_seq
    }

    /// Number of items handed out so far.
    pub fn popped(&self) -> usize {
        let inner = self.lock();
        inner.next_seq - inner.items.len()
    }
}

impl<T> FromIterator<T> for WorkQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let queue = WorkQueue::new();
        let mut inner = queue.lock();
        for item in iter {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.items.push_back(Ticket { seq, item });
        }
        drop(inner);
        queue
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn pops_in_insertion_order() {
        let q: WorkQueue<u32> = [15, 10, 5, 2].into_iter().collect();
        let popped: Vec<_> = std::iter::from_fn(|| q.pop()).collect();
        assert_eq!(
            popped,
            vec![
                Ticket { seq: 0, item: 15 },
                Ticket { seq: 1, item: 10 },
                Ticket { seq: 2, item: 5 },
                Ticket { seq: 3, item: 2 },
            ]
        );
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn counters_track_progress() {
        let q = WorkQueue::new();
        assert_eq!(q.extend(["a", "b", "c"]).unwrap(), 3);
        assert_eq!(q.push("d").unwrap(), 3);
        q.pop();

        assert_eq!(q.enqueued(), 4);
        assert_eq!(q.popped(), 1);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn sealed_queue_rejects_pushes_but_still_drains() {
        let q = WorkQueue::new();
        q.push(1).unwrap();
        q.seal();
        q.seal();

        assert_eq!(q.push(2), Err(QueueError::Sealed(1)));
        assert_eq!(q.extend([3, 4]), Err(QueueError::Sealed(2)));
        assert_eq!(q.pop().map(|t| t.item), Some(1));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn concurrent_pops_hand_out_each_item_once() {
        let q: Arc<WorkQueue<usize>> = Arc::new((0..1000).collect());
        q.seal();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(t) = q.pop() {
                        seen.push(t.seq);
                    }
                    seen
                })
            })
            .collect();

        let mut all = HashSet::new();
        for h in handles {
            let seen = h.join().unwrap();
            // each consumer observes strictly increasing sequence numbers
            assert!(seen.windows(2).all(|w| w[0] < w[1]));
            for seq in seen {
                assert!(all.insert(seq), "item {seq} popped twice");
            }
        }
        assert_eq!(all.len(), 1000);
        assert!(q.is_empty());
    }
}
