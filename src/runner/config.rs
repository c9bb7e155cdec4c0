// Runner configuration

use crate::journal::{Console, DEFAULT_FLUSH_EVERY};

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Log object path, `{run_id}` is replaced per session
    pub log_path: String,
    /// Flush the journal every N lines
    pub flush_every: usize,
    /// Mirror journal lines to stdout
    pub console: Console,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_path: "dbt_logs/{run_id}.log".to_string(),
            flush_every: DEFAULT_FLUSH_EVERY,
            console: Console::Stdout,
        }
    }
}

impl RunnerConfig {
    /// Log path for a given run
    pub fn log_path_for(&self, run_id: &str) -> String {
        self.log_path.replace("{run_id}", run_id)
    }
}
