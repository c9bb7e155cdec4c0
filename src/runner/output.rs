// Child process with stdout and stderr merged into a single stream

use super::{CommandSpec, Result, RunnerError};
use std::process::Stdio;
use tokio::io::{AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

/// Combined, line-readable output of a child
pub type MergedOutput = BufReader<Box<dyn AsyncRead + Send + Unpin>>;

fn base_command(spec: &CommandSpec) -> Command {
    let mut command = Command::new(&spec.program);
    command.args(&spec.args).stdin(Stdio::null());
    if let Some(cwd) = &spec.cwd {
        command.current_dir(cwd);
    }
    command
}

fn spawn_error(spec: &CommandSpec) -> impl FnOnce(std::io::Error) -> RunnerError + '_ {
    move |source| RunnerError::Spawn {
        program: spec.program.clone(),
        source,
    }
}

/// Spawn the command with both output streams writing to one pipe,
/// so lines arrive in the order the child wrote them
#[cfg(unix)]
pub fn spawn_merged(spec: &CommandSpec) -> Result<(Child, MergedOutput)> {
    use std::os::fd::OwnedFd;
    use tokio::net::unix::pipe;

    let (reader, writer) = std::io::pipe().map_err(RunnerError::Pipe)?;
    let stderr_writer = writer.try_clone().map_err(RunnerError::Pipe)?;

    // Readable before the child exists, so a failure here never orphans it
    let receiver =
        pipe::Receiver::from_owned_fd(OwnedFd::from(reader)).map_err(RunnerError::Pipe)?;

    let mut command = base_command(spec);
    command.stdout(writer).stderr(stderr_writer);

    let child = command.spawn().map_err(spawn_error(spec))?;
    // The parent's write ends must be closed or the reader never sees EOF
    drop(command);

    debug!(program = %spec.program, pid = ?child.id(), "child spawned with merged output");

    let output: Box<dyn AsyncRead + Send + Unpin> = Box::new(receiver);
    Ok((child, BufReader::new(output)))
}

/// Without a shared pipe only stdout is streamed; stderr goes to the console
#[cfg(not(unix))]
pub fn spawn_merged(spec: &CommandSpec) -> Result<(Child, MergedOutput)> {
    let mut command = base_command(spec);
    command.stdout(Stdio::piped()).stderr(Stdio::inherit());

    let mut child = command.spawn().map_err(spawn_error(spec))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RunnerError::Pipe(std::io::Error::other("stdout was not captured")))?;

    debug!(program = %spec.program, pid = ?child.id(), "child spawned, stderr inherited");

    let output: Box<dyn AsyncRead + Send + Unpin> = Box::new(stdout);
    Ok((child, BufReader::new(output)))
}
