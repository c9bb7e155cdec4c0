// Variable library - prefixed environment values as configuration input
#![allow(dead_code)]

use super::ConfigOverrides;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Default library name, giving a `DBT_CONFIG_` prefix
pub const DEFAULT_LIBRARY: &str = "dbt_config";

/// Key/value source scoped by a name prefix
#[derive(Debug, Clone)]
pub struct VariableLibrary {
    name: String,
    variables: HashMap<String, String>,
}

impl Default for VariableLibrary {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY)
    }
}

impl VariableLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn prefix(&self) -> String {
        format!("{}_", self.name.to_uppercase())
    }

    /// Load from the process environment, reading `.env` first if present
    pub fn load_from_env(&mut self) -> &HashMap<String, String> {
        dotenvy::dotenv().ok();

        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        self.load_from(vars)
    }

    /// Load from explicit key/value pairs, replacing anything loaded before
    pub fn load_from<I>(&mut self, vars: I) -> &HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = self.prefix();

        self.variables = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|name| (name.to_lowercase(), value))
            })
            .collect();

        debug!(
            library = %self.name,
            count = self.variables.len(),
            "variable library loaded"
        );
        &self.variables
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Set a value in the local cache only
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn all(&self) -> HashMap<String, String> {
        self.variables.clone()
    }

    /// dbt settings found in the library.
    ///
    /// A `vars` entry that is not a JSON object yields an empty mapping.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project_dir: self.get("project_dir").map(PathBuf::from),
            profiles_dir: self.get("profiles_dir").map(PathBuf::from),
            target: self.get("target").map(str::to_string),
            vars: self.get("vars").map(parse_vars),
        }
    }
}

fn parse_vars(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!(kind = ?other, "vars is not a JSON object, ignoring");
            Map::new()
        }
        Err(e) => {
            debug!(error = %e, "vars is not valid JSON, ignoring");
            Map::new()
        }
    }
}
