// Config module - dbt project settings and their command-line rendering

pub mod variables;

pub use variables::VariableLibrary;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Default dbt target
pub const DEFAULT_TARGET: &str = "dev";

/// Settings shared by every dbt invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbtConfig {
    /// dbt project directory
    pub project_dir: PathBuf,
    /// Directory holding profiles.yml
    pub profiles_dir: PathBuf,
    /// Target environment
    pub target: String,
    /// Variables passed as `--vars`
    #[serde(default)]
    pub vars: Map<String, Value>,
}

/// Optional values layered over the defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub project_dir: Option<PathBuf>,
    pub profiles_dir: Option<PathBuf>,
    pub target: Option<String>,
    pub vars: Option<Map<String, Value>>,
}

impl ConfigOverrides {
    /// Drop empty strings and paths so they count as unset
    pub fn non_empty(self) -> ConfigOverrides {
        ConfigOverrides {
            project_dir: self.project_dir.filter(|p| !p.as_os_str().is_empty()),
            profiles_dir: self.profiles_dir.filter(|p| !p.as_os_str().is_empty()),
            target: self.target.filter(|t| !t.is_empty()),
            vars: self.vars,
        }
    }

    /// Values set here win over values set in `base`; empty values never win
    pub fn or(self, base: ConfigOverrides) -> ConfigOverrides {
        let (overlay, base) = (self.non_empty(), base.non_empty());
        ConfigOverrides {
            project_dir: overlay.project_dir.or(base.project_dir),
            profiles_dir: overlay.profiles_dir.or(base.profiles_dir),
            target: overlay.target.or(base.target),
            vars: overlay.vars.or(base.vars),
        }
    }
}

fn default_project_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_profiles_dir() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".dbt"))
        .unwrap_or_else(|| PathBuf::from(".dbt"))
}

impl Default for DbtConfig {
    fn default() -> Self {
        Self {
            project_dir: default_project_dir(),
            profiles_dir: default_profiles_dir(),
            target: DEFAULT_TARGET.to_string(),
            vars: Map::new(),
        }
    }
}

impl DbtConfig {
    /// Build from overrides; empty values fall back to defaults
    pub fn from_overrides(overrides: ConfigOverrides) -> Self {
        let defaults = Self::default();

        Self {
            project_dir: overrides
                .project_dir
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(defaults.project_dir),
            profiles_dir: overrides
                .profiles_dir
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(defaults.profiles_dir),
            target: overrides
                .target
                .filter(|t| !t.is_empty())
                .unwrap_or(defaults.target),
            vars: overrides.vars.unwrap_or_default(),
        }
    }

    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    pub fn with_profiles_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profiles_dir = dir.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_vars(mut self, vars: Map<String, Value>) -> Self {
        self.vars = vars;
        self
    }

    /// Render as dbt command-line flags
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--project-dir".to_string(),
            self.project_dir.display().to_string(),
            "--profiles-dir".to_string(),
            self.profiles_dir.display().to_string(),
            "--target".to_string(),
            self.target.clone(),
        ];

        if !self.vars.is_empty() {
            args.push("--vars".to_string());
            args.push(Value::Object(self.vars.clone()).to_string());
        }

        args
    }
}
