// Error types for Runner module

use super::RunSummary;
use thiserror::Error;

/// Runner error types
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to set up output pipe: {0}")]
    Pipe(#[source] std::io::Error),

    #[error("dbt run failed with exit code {code}")]
    RunFailed {
        code: i32,
        summary: Box<RunSummary>,
    },
}

pub type Result<T> = std::result::Result<T, RunnerError>;
