// Journal writer - buffered, best-effort log persistence
#![allow(dead_code)]

use super::{Console, JournalConfig, Level, LogLine};
use crate::sink::LogSink;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, warn};

/// Accumulates a run's log and overwrites it at the sink on every flush
pub struct Journal {
    config: JournalConfig,
    sink: Arc<dyn LogSink>,
    /// Lines logged since the last flush
    buffer: Vec<LogLine>,
    /// Everything flushed so far
    persisted: String,
}

impl Journal {
    pub fn new(sink: Arc<dyn LogSink>, config: JournalConfig) -> Self {
        debug!(
            sink = sink.name(),
            log_path = %config.log_path,
            flush_every = config.flush_every,
            "journal created"
        );

        Self {
            config,
            sink,
            buffer: Vec::new(),
            persisted: String::new(),
        }
    }

    /// Format, mirror and buffer a line, flushing when the buffer is full
    pub async fn log(&mut self, message: impl Into<String>, level: Level, terminator: &str) {
        let line = LogLine::new(level, message, terminator);

        if self.config.console == Console::Stdout {
            let mut stdout = std::io::stdout().lock();
            // A closed stdout must not stop the run
            let _ = stdout.write_all(line.render().as_bytes());
            let _ = stdout.flush();
        }

        self.buffer.push(line);

        if self.buffer.len() >= self.config.flush_every {
            self.flush().await;
        }
    }

    pub async fn info(&mut self, message: impl Into<String>) {
        self.log(message, Level::Info, "\n").await;
    }

    pub async fn error(&mut self, message: impl Into<String>) {
        self.log(message, Level::Error, "\n").await;
    }

    /// Persist buffered lines. Returns whether a write was attempted.
    ///
    /// Sink failures are reported as warnings and never returned; the
    /// flushed lines stay in the persisted log either way.
    pub async fn flush(&mut self) -> bool {
        if self.buffer.is_empty() {
            return false;
        }

        let chunk: String = self.buffer.drain(..).map(|line| line.render()).collect();
        self.persisted.push_str(&chunk);

        match self
            .sink
            .put(&self.config.log_path, &self.persisted, true)
            .await
        {
            Ok(()) => {
                debug!(
                    sink = self.sink.name(),
                    log_path = %self.config.log_path,
                    bytes = self.persisted.len(),
                    "journal flushed"
                );
            }
            Err(e) => {
                warn!(
                    sink = self.sink.name(),
                    log_path = %self.config.log_path,
                    error = %e,
                    "Failed to flush logs"
                );
            }
        }

        true
    }

    /// Everything flushed so far
    pub fn persisted(&self) -> &str {
        &self.persisted
    }

    /// Lines waiting for the next flush
    pub fn buffered(&self) -> &[LogLine] {
        &self.buffer
    }

    pub fn log_path(&self) -> &str {
        &self.config.log_path
    }
}
