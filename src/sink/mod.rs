// Sink module - durable storage for run logs
// Every write replaces the whole object at the target path

pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod memory;

pub use config::HttpSinkConfig;
pub use error::{Result, SinkError};
pub use file::FileSink;
pub use http::HttpSink;
pub use memory::{MemorySink, SinkWrite};

use async_trait::async_trait;

/// Storage capability used to persist accumulated logs
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Write `content` to `path`, replacing any existing object when `overwrite` is set
    async fn put(&self, path: &str, content: &str, overwrite: bool) -> Result<()>;

    /// Short name used in diagnostics
    fn name(&self) -> &'static str;
}
