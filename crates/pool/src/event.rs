//! Progress events emitted by workers and the output they render to.

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use coop_core::format_secs;
use serde::Serialize;

/// Something a worker or the driver reports while a pool runs.
///
/// `Display` renders the exact report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    /// A worker started a count or a delay.
    Running { worker: String },
    /// A worker started fetching a URL.
    Fetching { worker: String, url: String },
    /// A worker finished counting.
    Counted { worker: String, total: u64 },
    /// A worker finished a timed unit (delay or fetch).
    Elapsed { worker: String, elapsed: Duration },
    /// The whole run finished.
    TotalElapsed { elapsed: Duration },
}

impl PoolEvent {
    pub fn worker(&self) -> Option<&str> {
        match self {
            PoolEvent::Running { worker }
            | PoolEvent::Fetching { worker, .. }
            | PoolEvent::Counted { worker, .. }
            | PoolEvent::Elapsed { worker, .. } => Some(worker),
            PoolEvent::TotalElapsed { .. } => None,
        }
    }
}

impl fmt::Display for PoolEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolEvent::Running { worker } => write!(f, "Task {worker} running"),
            PoolEvent::Fetching { worker, url } => write!(f, "Task {worker} getting URL: {url}"),
            PoolEvent::Counted { worker, total } => write!(f, "Task {worker} total: {total}"),
            PoolEvent::Elapsed { worker, elapsed } => {
                write!(f, "Task {worker} elapsed time: {}", format_secs(*elapsed))
            }
            PoolEvent::TotalElapsed { elapsed } => {
                write!(f, "\nTotal elapsed time: {}", format_secs(*elapsed))
            }
        }
    }
}

/// Sink for [`PoolEvent`]s. Called from whichever task or step emits them.
pub trait Reporter: Send + Sync {
    fn report(&self, event: PoolEvent);
}

/// Prints every event on its own line to stdout.
#[derive(Debug, Clone)]
pub struct StdoutReporter {
    show_total: bool,
}

impl Default for StdoutReporter {
    fn default() -> Self {
        Self { show_total: true }
    }
}

impl StdoutReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the final total line.
    pub fn without_total() -> Self {
        Self { show_total: false }
    }
}

impl Reporter for StdoutReporter {
    fn report(&self, event: PoolEvent) {
        if !self.show_total && matches!(event, PoolEvent::TotalElapsed { .. }) {
            return;
        }
        println!("{event}");
    }
}

/// Records events in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<PoolEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PoolEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rendered lines, excluding the total (its value depends on the clock).
    pub fn lines(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter(|e| !matches!(e, PoolEvent::TotalElapsed { .. }))
            .map(ToString::to_string)
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, event: PoolEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: PoolEvent) {}
}

/// Log an event and hand it to the reporter.
pub(crate) fn emit(reporter: &dyn Reporter, event: PoolEvent) {
    tracing::debug!(worker = event.worker().unwrap_or("-"), "{}", event.to_string().trim_start());
    reporter.report(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_report_lines() {
        let cases = [
            (PoolEvent::Running { worker: "One".into() }, "Task One running"),
            (
                PoolEvent::Fetching { worker: "Two".into(), url: "http://yahoo.com".into() },
                "Task Two getting URL: http://yahoo.com",
            ),
            (PoolEvent::Counted { worker: "Two".into(), total: 10 }, "Task Two total: 10"),
            (
                PoolEvent::Elapsed { worker: "One".into(), elapsed: Duration::from_millis(15_020) },
                "Task One elapsed time: 15.0",
            ),
            (
                PoolEvent::TotalElapsed { elapsed: Duration::from_millis(1_720) },
                "\nTotal elapsed time: 1.7",
            ),
        ];
        for (event, line) in cases {
            assert_eq!(event.to_string(), line);
        }
    }

    #[test]
    fn memory_reporter_keeps_order_and_hides_total() {
        let r = MemoryReporter::new();
        r.report(PoolEvent::Running { worker: "One".into() });
        r.report(PoolEvent::Counted { worker: "One".into(), total: 2 });
        r.report(PoolEvent::TotalElapsed { elapsed: Duration::ZERO });

        assert_eq!(r.events().len(), 3);
        assert_eq!(r.lines(), vec!["Task One running", "Task One total: 2"]);
    }

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_value(PoolEvent::Counted { worker: "One".into(), total: 15 }).unwrap();
        assert_eq!(json["event"], "counted");
        assert_eq!(json["worker"], "One");
        assert_eq!(json["total"], 15);
    }

    #[test]
    fn worker_accessor() {
        assert_eq!(PoolEvent::Running { worker: "One".into() }.worker(), Some("One"));
        assert_eq!(PoolEvent::TotalElapsed { elapsed: Duration::ZERO }.worker(), None);
    }
}
