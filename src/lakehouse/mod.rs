// Lakehouse module - paths inside a Fabric lakehouse mount
#![allow(dead_code)]

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default lakehouse name
pub const DEFAULT_NAME: &str = "default";
/// Default lakehouse mount point
pub const DEFAULT_ROOT: &str = "/lakehouse/default";

/// A lakehouse and its mount point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lakehouse {
    pub name: String,
    pub root: PathBuf,
}

impl Default for Lakehouse {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_ROOT)
    }
}

impl Lakehouse {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// Load from `FABRIC_LAKEHOUSE_NAME` / `FABRIC_LAKEHOUSE_PATH`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let name = std::env::var("FABRIC_LAKEHOUSE_NAME").unwrap_or_else(|_| DEFAULT_NAME.into());
        let root = std::env::var("FABRIC_LAKEHOUSE_PATH").unwrap_or_else(|_| DEFAULT_ROOT.into());
        Self::new(name, root)
    }

    pub fn tables_path(&self) -> PathBuf {
        self.root.join("Tables")
    }

    pub fn files_path(&self) -> PathBuf {
        self.root.join("Files")
    }

    pub fn table_location(&self, table: &str) -> PathBuf {
        self.tables_path().join(table)
    }

    /// Default location of a run's log under `Files/dbt_logs`
    pub fn default_log_path(&self, run_id: &str) -> PathBuf {
        self.files_path()
            .join("dbt_logs")
            .join(format!("{}.log", run_id))
    }

    /// Table directories under `Tables/`; empty when missing or unreadable
    pub fn list_tables(&self) -> Vec<String> {
        list_dirs(&self.tables_path())
    }
}

fn list_dirs(path: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "tables directory not readable");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}
