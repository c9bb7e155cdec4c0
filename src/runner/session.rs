// Run session - state of one dbt execution
#![allow(dead_code)]

use super::RunSummary;
use crate::classify::{FailureCategory, classify};
use crate::journal::Journal;
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// One execution of dbt and its log lifecycle
pub struct RunSession {
    pub run_id: Uuid,
    pub started_at: DateTime<Local>,
    started: Instant,
    /// False once dbt exits nonzero
    pub success: bool,
    /// First classified failure, never overwritten
    pub failure: Option<FailureCategory>,
    pub exit_code: Option<i32>,
    /// Set at finalization
    pub duration: Option<Duration>,
    pub journal: Journal,
}

impl RunSession {
    pub fn new(run_id: Uuid, journal: Journal) -> Self {
        Self {
            run_id,
            started_at: Local::now(),
            started: Instant::now(),
            success: true,
            failure: None,
            exit_code: None,
            duration: None,
            journal,
        }
    }

    /// Classify a line unless a failure is already recorded
    pub fn observe(&mut self, line: &str) {
        if self.failure.is_none() {
            self.failure = classify(line);
        }
    }

    /// Time since the session started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id.to_string(),
            success: self.success,
            failure: self.failure,
            exit_code: self.exit_code,
            duration_secs: self.duration.unwrap_or_else(|| self.elapsed()).as_secs_f64(),
            log_path: self.journal.log_path().to_string(),
        }
    }
}
