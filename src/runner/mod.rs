// Runner module - launches dbt and streams its output into a journal

pub mod config;
pub mod error;
pub mod executor;
pub mod output;
pub mod session;
pub mod types;

pub use config::RunnerConfig;
pub use error::{Result, RunnerError};
pub use executor::Runner;
pub use session::RunSession;
pub use types::{CommandSpec, RunSummary};
