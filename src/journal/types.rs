// Data types for Journal module

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a journal line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

/// One formatted log line, never mutated after creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
    pub terminator: String,
}

impl LogLine {
    pub fn new(level: Level, message: impl Into<String>, terminator: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
            terminator: terminator.into(),
        }
    }

    /// `[<timestamp>] [<LEVEL>] <message><terminator>`
    pub fn render(&self) -> String {
        format!(
            "[{}] [{}] {}{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.message,
            self.terminator
        )
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_format() {
        let line = LogLine {
            timestamp: Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap(),
            level: Level::Error,
            message: "dbt exited with return code 2".to_string(),
            terminator: "\n".to_string(),
        };
        assert_eq!(
            line.render(),
            "[2024-03-09 07:05:01] [ERROR] dbt exited with return code 2\n"
        );
    }

    #[test]
    fn test_render_without_terminator() {
        let line = LogLine::new(Level::Info, "partial", "");
        assert!(line.render().ends_with("[INFO] partial"));
    }
}
