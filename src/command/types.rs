// Data types for Command module

use std::fmt;
use std::str::FromStr;

/// dbt subcommands the runner knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Run,
    Test,
    Build,
    Compile,
    Debug,
    Deps,
    Seed,
    Snapshot,
}

impl Subcommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Run => "run",
            Subcommand::Test => "test",
            Subcommand::Build => "build",
            Subcommand::Compile => "compile",
            Subcommand::Debug => "debug",
            Subcommand::Deps => "deps",
            Subcommand::Seed => "seed",
            Subcommand::Snapshot => "snapshot",
        }
    }

    pub fn accepts_models(&self) -> bool {
        matches!(self, Subcommand::Run | Subcommand::Test | Subcommand::Compile)
    }

    pub fn accepts_select(&self) -> bool {
        !matches!(self, Subcommand::Debug | Subcommand::Deps)
    }

    pub fn accepts_exclude(&self) -> bool {
        matches!(self, Subcommand::Run | Subcommand::Build)
    }

    pub fn accepts_full_refresh(&self) -> bool {
        matches!(self, Subcommand::Run | Subcommand::Build | Subcommand::Seed)
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass-through flag for options without a typed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraFlag {
    /// `--<key>`
    Switch(String),
    /// `--<key> <value>`
    Value(String, String),
}

impl ExtraFlag {
    fn flag_name(key: &str) -> String {
        format!("--{}", key.replace('_', "-"))
    }

    pub fn to_args(&self) -> Vec<String> {
        match self {
            ExtraFlag::Switch(key) => vec![Self::flag_name(key)],
            ExtraFlag::Value(key, value) => vec![Self::flag_name(key), value.clone()],
        }
    }
}

/// Parses `key` as a switch and `key=value` as a valued flag
impl FromStr for ExtraFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = match s.split_once('=') {
            Some((key, value)) => (key.trim(), Some(value)),
            None => (s.trim(), None),
        };
        let key = key.trim_start_matches('-');

        if key.is_empty() {
            return Err(format!("flag '{}' has no name", s));
        }

        Ok(match value {
            Some(value) => ExtraFlag::Value(key.to_string(), value.to_string()),
            None => ExtraFlag::Switch(key.to_string()),
        })
    }
}

/// Per-invocation selection options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    pub models: Vec<String>,
    pub select: Option<String>,
    pub exclude: Option<String>,
    pub full_refresh: bool,
    pub extra: Vec<ExtraFlag>,
}
