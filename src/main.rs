mod classify;
mod command;
mod config;
mod journal;
mod lakehouse;
mod runner;
mod sink;

use clap::{ArgAction, Parser};
use command::{CommandOptions, DbtCommand, ExtraFlag, Subcommand};
use config::{ConfigOverrides, DbtConfig, VariableLibrary};
use journal::{Console, DEFAULT_FLUSH_EVERY};
use lakehouse::Lakehouse;
use runner::{Runner, RunnerConfig, RunnerError};
use serde_json::{Map, Value};
use sink::{FileSink, HttpSink, HttpSinkConfig, LogSink, MemorySink, SinkError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Level, error, info};
use tracing_subscriber::fmt;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "fabric-dbt-runner")]
#[command(about = "Run dbt with live, persisted and classified logs")]
struct Args {
    #[command(subcommand)]
    action: Action,

    /// dbt project directory (default: current directory)
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,

    /// dbt profiles directory (default: ~/.dbt)
    #[arg(long, global = true)]
    profiles_dir: Option<PathBuf>,

    /// Target environment (default: dev)
    #[arg(long, global = true)]
    target: Option<String>,

    /// dbt variables as a JSON object
    #[arg(long, global = true)]
    vars: Option<String>,

    /// Variable library read from <LIBRARY>_* environment variables
    #[arg(long, global = true, default_value = "dbt_config")]
    library: String,

    /// dbt executable
    #[arg(long, global = true, default_value = command::DEFAULT_EXECUTABLE)]
    dbt: String,

    /// Run dbt inside the project directory instead of the current one
    #[arg(long, global = true)]
    in_project: bool,

    /// Log object path; `{run_id}` is replaced per run
    #[arg(long, global = true)]
    log_path: Option<String>,

    /// Base URL of a remote log store (default: DBT_LOG_SINK_URL)
    #[arg(long, global = true)]
    log_url: Option<String>,

    /// Keep logs in memory only
    #[arg(long, global = true)]
    no_persist: bool,

    /// Flush logs every N lines
    #[arg(long, global = true, default_value_t = DEFAULT_FLUSH_EVERY)]
    flush_every: usize,

    /// Do not mirror log lines to stdout
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print the run summary as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Diagnostic verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Action {
    /// Run models
    Run(SelectArgs),
    /// Run data tests
    Test(SelectArgs),
    /// Run and test models in dependency order
    Build(SelectArgs),
    /// Compile models without running them
    Compile(SelectArgs),
    /// Check the dbt installation and connection
    Debug,
    /// Install package dependencies
    Deps,
    /// Load seed files
    Seed(SelectArgs),
    /// Execute snapshots
    Snapshot(SelectArgs),
    /// Show resolved configuration and lakehouse layout
    Info,
}

/// Selection options shared by subcommands
#[derive(Debug, Clone, Default, clap::Args)]
struct SelectArgs {
    /// Model to include (repeatable)
    #[arg(short = 'm', long = "models")]
    models: Vec<String>,

    /// dbt selection syntax
    #[arg(short, long)]
    select: Option<String>,

    /// dbt exclusion syntax
    #[arg(long)]
    exclude: Option<String>,

    /// Force full refresh
    #[arg(long)]
    full_refresh: bool,

    /// Extra dbt flag as KEY or KEY=VALUE (repeatable)
    #[arg(long = "flag", value_name = "KEY[=VALUE]")]
    flags: Vec<ExtraFlag>,
}

impl From<SelectArgs> for CommandOptions {
    fn from(args: SelectArgs) -> Self {
        CommandOptions {
            models: args.models,
            select: args.select,
            exclude: args.exclude,
            full_refresh: args.full_refresh,
            extra: args.flags,
        }
    }
}

/// CLI errors
#[derive(Debug, Error)]
enum CliError {
    #[error("--vars must be a JSON object: {0}")]
    InvalidVars(String),

    #[error("Log sink error: {0}")]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_cli_vars(raw: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CliError::InvalidVars(format!("got {}", other))),
        Err(e) => Err(CliError::InvalidVars(e.to_string())),
    }
}

fn resolve_config(args: &Args) -> Result<DbtConfig, CliError> {
    let mut library = VariableLibrary::new(args.library.as_str());
    library.load_from_env();

    let cli = ConfigOverrides {
        project_dir: args.project_dir.clone(),
        profiles_dir: args.profiles_dir.clone(),
        target: args.target.clone(),
        vars: args.vars.as_deref().map(parse_cli_vars).transpose()?,
    };

    Ok(DbtConfig::from_overrides(cli.or(library.overrides())))
}

/// Pick the sink and its log path template
fn build_sink(args: &Args, lakehouse: &Lakehouse) -> Result<(Arc<dyn LogSink>, String), CliError> {
    if args.no_persist {
        let path = args
            .log_path
            .clone()
            .unwrap_or_else(|| "dbt_logs/{run_id}.log".to_string());
        let sink: Arc<dyn LogSink> = Arc::new(MemorySink::new());
        return Ok((sink, path));
    }

    let http = match &args.log_url {
        Some(url) => Some(HttpSinkConfig {
            base_url: url.clone(),
            ..HttpSinkConfig::from_env().unwrap_or_default()
        }),
        None => HttpSinkConfig::from_env(),
    };

    if let Some(http) = http {
        let path = args
            .log_path
            .clone()
            .unwrap_or_else(|| "dbt_logs/{run_id}.log".to_string());
        let sink: Arc<dyn LogSink> = Arc::new(HttpSink::new(http)?);
        return Ok((sink, path));
    }

    let path = args.log_path.clone().unwrap_or_else(|| {
        lakehouse
            .default_log_path("{run_id}")
            .display()
            .to_string()
    });
    let sink: Arc<dyn LogSink> = Arc::new(FileSink::new());
    Ok((sink, path))
}

fn print_info(args: &Args, config: &DbtConfig, lakehouse: &Lakehouse) -> Result<(), CliError> {
    let info = serde_json::json!({
        "library": args.library,
        "config": config,
        "args": config.to_args(),
        "lakehouse": lakehouse,
        "tables_path": lakehouse.tables_path(),
        "files_path": lakehouse.files_path(),
        "tables": lakehouse.list_tables(),
    });
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

/// `--json` owns stdout, so it silences the live mirror like `--quiet`
fn console_mode(args: &Args) -> Console {
    if args.quiet || args.json {
        Console::Silent
    } else {
        Console::Stdout
    }
}

async fn execute(args: Args) -> Result<(), CliError> {
    let config = resolve_config(&args)?;
    let lakehouse = Lakehouse::from_env();

    let (subcommand, options) = match args.action.clone() {
        Action::Run(sel) => (Subcommand::Run, sel.into()),
        Action::Test(sel) => (Subcommand::Test, sel.into()),
        Action::Build(sel) => (Subcommand::Build, sel.into()),
        Action::Compile(sel) => (Subcommand::Compile, sel.into()),
        Action::Seed(sel) => (Subcommand::Seed, sel.into()),
        Action::Snapshot(sel) => (Subcommand::Snapshot, sel.into()),
        Action::Debug => (Subcommand::Debug, CommandOptions::default()),
        Action::Deps => (Subcommand::Deps, CommandOptions::default()),
        Action::Info => return print_info(&args, &config, &lakehouse),
    };

    let (sink, log_path) = build_sink(&args, &lakehouse)?;
    let runner = Runner::new(
        sink,
        RunnerConfig {
            log_path,
            flush_every: args.flush_every.max(1),
            console: console_mode(&args),
        },
    );

    let dbt = DbtCommand::new(args.dbt.as_str(), subcommand, &config, &options);
    let spec = if args.in_project {
        dbt.to_spec_in_project()
    } else {
        dbt.to_spec()
    };

    info!(
        subcommand = %dbt.subcommand(),
        target = %config.target,
        project_dir = %config.project_dir.display(),
        "Configuration loaded"
    );

    let result = runner.run(&spec).await;

    if args.json {
        let summary = match &result {
            Ok(session) => Some(session.summary()),
            Err(RunnerError::RunFailed { summary, .. }) => Some(summary.as_ref().clone()),
            Err(_) => None,
        };
        if let Some(summary) = summary {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    result?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match execute(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fabric-dbt-runner failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
