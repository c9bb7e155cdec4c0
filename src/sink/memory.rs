// In-memory sink - records writes for tests and dry runs
#![allow(dead_code)]

use super::{LogSink, Result, SinkError};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// A single recorded write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkWrite {
    pub path: String,
    pub content: String,
    pub overwrite: bool,
}

/// Keeps every write in order
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<SinkWrite>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that rejects every write
    pub fn failing() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// All successful writes so far
    pub fn writes(&self) -> Vec<SinkWrite> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Content of the most recent write
    pub fn last_content(&self) -> Option<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|w| w.content.clone())
    }
}

#[async_trait]
impl LogSink for MemorySink {
    async fn put(&self, path: &str, content: &str, overwrite: bool) -> Result<()> {
        if self.fail {
            return Err(SinkError::Injected(path.to_string()));
        }

        let mut writes = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        if !overwrite && writes.iter().any(|w| w.path == path) {
            return Err(SinkError::AlreadyExists(path.to_string()));
        }
        writes.push(SinkWrite {
            path: path.to_string(),
            content: content.to_string(),
            overwrite,
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
