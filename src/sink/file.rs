// Filesystem sink - local disk or a mounted lakehouse Files/ area
#![allow(dead_code)]

use super::{LogSink, Result, SinkError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes logs to the filesystem
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    /// Base directory for relative paths
    base_dir: Option<PathBuf>,
}

impl FileSink {
    /// Sink resolving relative paths against the current directory
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    /// Sink resolving relative paths against `base_dir`
    pub fn rooted(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Resolve a log path to its on-disk location
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl LogSink for FileSink {
    async fn put(&self, path: &str, content: &str, overwrite: bool) -> Result<()> {
        let target = self.resolve(path);

        if !overwrite && tokio::fs::try_exists(&target).await? {
            return Err(SinkError::AlreadyExists(target.display().to_string()));
        }

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&target, content).await?;

        debug!(path = %target.display(), bytes = content.len(), "log written to file");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("fabric-dbt-runner-tests")
            .join(format!("{}-{}", name, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_put_creates_parents_and_overwrites() {
        let dir = scratch_dir("file-sink");
        let sink = FileSink::rooted(&dir);

        sink.put("dbt_logs/run.log", "first\n", true).await.unwrap();
        sink.put("dbt_logs/run.log", "first\nsecond\n", true)
            .await
            .unwrap();

        let content = std::fs::read_to_string(dir.join("dbt_logs/run.log")).unwrap();
        assert_eq!(content, "first\nsecond\n");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_put_without_overwrite_rejects_existing() {
        let dir = scratch_dir("file-sink-no-overwrite");
        let sink = FileSink::rooted(&dir);

        sink.put("run.log", "a", false).await.unwrap();
        let result = sink.put("run.log", "b", false).await;
        assert!(matches!(result, Err(SinkError::AlreadyExists(_))));

        let content = std::fs::read_to_string(dir.join("run.log")).unwrap();
        assert_eq!(content, "a");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let sink = FileSink::rooted("/lakehouse/default");
        assert_eq!(
            sink.resolve("Files/run.log"),
            PathBuf::from("/lakehouse/default/Files/run.log")
        );
        assert_eq!(sink.resolve("/tmp/run.log"), PathBuf::from("/tmp/run.log"));
        assert_eq!(FileSink::new().resolve("run.log"), PathBuf::from("run.log"));
    }
}
