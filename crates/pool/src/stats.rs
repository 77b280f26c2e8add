use std::time::Duration;

use coop_core::format_secs;
use serde::Serialize;
use tracing::info;

use crate::worker::WorkerId;

/// What one worker did during a run.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStats {
    pub id: WorkerId,
    pub name: String,
    /// Queue sequence numbers of the items this worker consumed, in order.
    pub consumed: Vec<usize>,
    /// Duration of each completed unit, parallel to `consumed`.
    pub unit_durations: Vec<Duration>,
    /// Sum of `unit_durations`.
    pub busy: Duration,
    /// From the worker's first step to observing the queue empty.
    pub lifetime: Duration,
}

impl WorkerStats {
    pub fn new(id: WorkerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            consumed: Vec::new(),
            unit_durations: Vec::new(),
            busy: Duration::ZERO,
            lifetime: Duration::ZERO,
        }
    }

    pub fn record(&mut self, seq: usize, elapsed: Duration) {
        self.consumed.push(seq);
        self.unit_durations.push(elapsed);
        self.busy += elapsed;
    }
}

/// Result of driving a pool to completion.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    /// One entry per worker, in registration order.
    pub workers: Vec<WorkerStats>,
}

impl RunReport {
    pub fn total_elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn worker(&self, name: &str) -> Option<&WorkerStats> {
        self.workers.iter().find(|w| w.name == name)
    }

    pub fn items_consumed(&self) -> usize {
        self.workers.iter().map(|w| w.consumed.len()).sum()
    }

    /// `(seq, worker name)` for every consumed item, ordered by sequence.
    pub fn assignments(&self) -> Vec<(usize, &str)> {
        let mut all: Vec<_> = self
            .workers
            .iter()
            .flat_map(|w| w.consumed.iter().map(move |&seq| (seq, w.name.as_str())))
            .collect();
        all.sort_unstable_by_key(|&(seq, _)| seq);
        all
    }

    pub fn log_summary(&self) {
        info!(
            elapsed = %format_secs(self.elapsed),
            items = self.items_consumed(),
            "run complete"
        );
        for w in &self.workers {
            info!(
                worker = %w.name,
                items = w.consumed.len(),
                busy = %format_secs(w.busy),
                lifetime = %format_secs(w.lifetime),
                "worker summary"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        let mut one = WorkerStats::new(WorkerId(0), "One");
        one.record(0, Duration::from_secs(15));
        one.record(3, Duration::from_secs(2));
        let mut two = WorkerStats::new(WorkerId(1), "Two");
        two.record(1, Duration::from_secs(10));
        two.record(2, Duration::from_secs(5));
        RunReport { elapsed: Duration::from_secs(17), workers: vec![one, two] }
    }

    #[test]
    fn record_accumulates_busy_time() {
        let r = report();
        assert_eq!(r.worker("One").unwrap().busy, Duration::from_secs(17));
        assert_eq!(r.worker("Two").unwrap().busy, Duration::from_secs(15));
        assert!(r.worker("Three").is_none());
    }

    #[test]
    fn assignments_are_ordered_by_sequence() {
        let r = report();
        assert_eq!(r.items_consumed(), 4);
        assert_eq!(r.assignments(), vec![(0, "One"), (1, "Two"), (2, "Two"), (3, "One")]);
    }
}
