// Error types for Sink module

use thiserror::Error;

/// Sink write errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Target '{0}' already exists and overwrite is disabled")]
    AlreadyExists(String),

    #[error("Remote rejected write to '{path}' with status {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Injected failure writing '{0}'")]
    Injected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SinkError>;
