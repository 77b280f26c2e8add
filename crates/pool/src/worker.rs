use std::fmt;

use serde::Serialize;

use crate::error::PoolError;

/// Registration index of a worker within its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered set of worker names, shared by both pool flavours.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    names: Vec<String>,
}

impl Registry {
    pub(crate) fn register(&mut self, name: &str) -> Result<WorkerId, PoolError> {
        if self.names.iter().any(|n| n == name) {
            return Err(PoolError::DuplicateWorker(name.to_string()));
        }
        self.names.push(name.to_string());
        Ok(WorkerId(self.names.len() - 1))
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub(crate) fn into_workers(self) -> impl Iterator<Item = (WorkerId, String)> {
        self.names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (WorkerId(i), name))
    }
}
