// Journal module - formats, mirrors, buffers and persists run log lines

pub mod config;
pub mod types;
pub mod writer;

pub use config::{Console, JournalConfig, DEFAULT_FLUSH_EVERY};
pub use types::{Level, LogLine};
pub use writer::Journal;
