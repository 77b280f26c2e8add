use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ItemParseError;

/// A unit of work placed on the shared queue. Immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItem {
    /// Count up to `n`, yielding once per increment.
    Count(u64),
    /// Wait for the given duration.
    Delay(Duration),
    /// GET the URL and consume the whole response body.
    Url(String),
}

/// How a bare integer on the command line is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeric {
    Count,
    DelaySecs,
}

impl WorkItem {
    pub fn delay_secs(secs: u64) -> Self {
        WorkItem::Delay(Duration::from_secs(secs))
    }

    pub fn url(url: impl Into<String>) -> Self {
        WorkItem::Url(url.into())
    }

    /// Parse a textual item. Anything containing `://` is a URL, an integer
    /// is interpreted according to `numeric`.
    pub fn parse(raw: &str, numeric: Numeric) -> Result<Self, ItemParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ItemParseError::Empty);
        }
        if raw.contains("://") {
            return Ok(WorkItem::Url(raw.to_string()));
        }
        let n: u64 = raw
            .parse()
            .map_err(|_| ItemParseError::Unrecognized(raw.to_string()))?;
        Ok(match numeric {
            Numeric::Count => WorkItem::Count(n),
            Numeric::DelaySecs => WorkItem::delay_secs(n),
        })
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkItem::Count(n) => write!(f, "count({n})"),
            WorkItem::Delay(d) => write!(f, "delay({:.1}s)", d.as_secs_f64()),
            WorkItem::Url(url) => f.write_str(url),
        }
    }
}
