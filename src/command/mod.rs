// Command module - dbt subcommand argument construction
#![allow(dead_code)]

pub mod types;

pub use types::{CommandOptions, ExtraFlag, Subcommand};

use crate::config::DbtConfig;
use crate::runner::CommandSpec;
use std::path::PathBuf;

/// Default dbt executable
pub const DEFAULT_EXECUTABLE: &str = "dbt";

/// A fully rendered dbt invocation
#[derive(Debug, Clone)]
pub struct DbtCommand {
    executable: String,
    subcommand: Subcommand,
    args: Vec<String>,
    project_dir: PathBuf,
}

impl DbtCommand {
    pub fn new(
        executable: impl Into<String>,
        subcommand: Subcommand,
        config: &DbtConfig,
        options: &CommandOptions,
    ) -> Self {
        let mut args = vec![subcommand.to_string()];
        args.extend(config.to_args());

        if subcommand.accepts_models() {
            for model in &options.models {
                args.push("--models".to_string());
                args.push(model.clone());
            }
        }
        if subcommand.accepts_select() {
            if let Some(select) = &options.select {
                args.push("--select".to_string());
                args.push(select.clone());
            }
        }
        if subcommand.accepts_exclude() {
            if let Some(exclude) = &options.exclude {
                args.push("--exclude".to_string());
                args.push(exclude.clone());
            }
        }
        if subcommand.accepts_full_refresh() && options.full_refresh {
            args.push("--full-refresh".to_string());
        }

        for flag in &options.extra {
            args.extend(flag.to_args());
        }

        Self {
            executable: executable.into(),
            subcommand,
            args,
            project_dir: config.project_dir.clone(),
        }
    }

    pub fn subcommand(&self) -> Subcommand {
        self.subcommand
    }

    /// Arguments after the executable
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Command for the runner; cwd is left to the caller
    pub fn to_spec(&self) -> CommandSpec {
        CommandSpec::new(&self.executable).args(self.args.iter().cloned())
    }

    /// Command for the runner, executed inside the project directory
    pub fn to_spec_in_project(&self) -> CommandSpec {
        self.to_spec().current_dir(&self.project_dir)
    }

    pub fn display(&self) -> String {
        self.to_spec().display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DbtConfig {
        DbtConfig::default()
            .with_project_dir("/work/analytics")
            .with_profiles_dir("/work/profiles")
    }

    const CONFIG_ARGS: [&str; 6] = [
        "--project-dir",
        "/work/analytics",
        "--profiles-dir",
        "/work/profiles",
        "--target",
        "dev",
    ];

    fn full_options() -> CommandOptions {
        CommandOptions {
            models: vec!["orders".to_string(), "customers".to_string()],
            select: Some("tag:nightly".to_string()),
            exclude: Some("staging".to_string()),
            full_refresh: true,
            extra: vec![
                ExtraFlag::Switch("fail_fast".to_string()),
                ExtraFlag::Value("threads".to_string(), "8".to_string()),
            ],
        }
    }

    #[test]
    fn test_run_renders_everything() {
        let command = DbtCommand::new("dbt", Subcommand::Run, &config(), &full_options());

        let mut expected = vec!["run"];
        expected.extend(CONFIG_ARGS);
        expected.extend([
            "--models",
            "orders",
            "--models",
            "customers",
            "--select",
            "tag:nightly",
            "--exclude",
            "staging",
            "--full-refresh",
            "--fail-fast",
            "--threads",
            "8",
        ]);
        assert_eq!(command.argv(), expected.as_slice());
    }

    #[test]
    fn test_seed_filters_unsupported_options() {
        let command = DbtCommand::new("dbt", Subcommand::Seed, &config(), &full_options());
        let argv = command.argv();

        assert_eq!(argv[0], "seed");
        assert!(!argv.iter().any(|a| a == "--models"));
        assert!(!argv.iter().any(|a| a == "--exclude"));
        assert!(argv.iter().any(|a| a == "--select"));
        assert!(argv.iter().any(|a| a == "--full-refresh"));
        assert!(argv.iter().any(|a| a == "--fail-fast"));
    }

    #[test]
    fn test_deps_takes_config_only() {
        let options = CommandOptions {
            select: Some("ignored".to_string()),
            ..Default::default()
        };
        let command = DbtCommand::new("dbt", Subcommand::Deps, &config(), &options);

        let mut expected = vec!["deps"];
        expected.extend(CONFIG_ARGS);
        assert_eq!(command.argv(), expected.as_slice());
    }

    #[test]
    fn test_spec_and_display() {
        let command = DbtCommand::new(
            "/opt/dbt/bin/dbt",
            Subcommand::Debug,
            &config(),
            &CommandOptions::default(),
        );

        let spec = command.to_spec();
        assert_eq!(spec.program, "/opt/dbt/bin/dbt");
        assert_eq!(spec.cwd, None);
        assert_eq!(
            command.to_spec_in_project().cwd,
            Some(PathBuf::from("/work/analytics"))
        );
        assert!(
            command
                .display()
                .starts_with("/opt/dbt/bin/dbt debug --project-dir /work/analytics")
        );
    }
}
