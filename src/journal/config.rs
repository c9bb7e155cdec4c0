// Journal configuration

/// Buffered lines that trigger an automatic flush
pub const DEFAULT_FLUSH_EVERY: usize = 25;

/// Where formatted lines are mirrored as they are logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Console {
    #[default]
    Stdout,
    Silent,
}

/// Journal configuration
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Path handed to the sink on every flush
    pub log_path: String,
    /// Flush once this many lines are buffered
    pub flush_every: usize,
    /// Live mirror for formatted lines
    pub console: Console,
}

impl JournalConfig {
    pub fn new(log_path: impl Into<String>) -> Self {
        Self {
            log_path: log_path.into(),
            flush_every: DEFAULT_FLUSH_EVERY,
            console: Console::default(),
        }
    }
}
