// Runner implementation - spawn, stream, finalize

use super::output::spawn_merged;
use super::{CommandSpec, Result, RunSession, RunnerConfig, RunnerError};
use crate::journal::{Journal, JournalConfig, Level};
use crate::sink::LogSink;
use std::process::ExitStatus;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Width of the summary block separators
const SEPARATOR_WIDTH: usize = 40;

/// Exit code reported when no status or signal is available
const UNKNOWN_EXIT_CODE: i32 = -1;

/// Runs dbt one session at a time
pub struct Runner {
    config: RunnerConfig,
    sink: Arc<dyn LogSink>,
}

impl Runner {
    pub fn new(sink: Arc<dyn LogSink>, config: RunnerConfig) -> Self {
        debug!(
            sink = sink.name(),
            log_path = %config.log_path,
            flush_every = config.flush_every,
            "initializing runner"
        );
        Self { config, sink }
    }

    /// Start a fresh session with its own journal
    pub fn session(&self) -> RunSession {
        let run_id = Uuid::new_v4();
        let journal = Journal::new(
            self.sink.clone(),
            JournalConfig {
                log_path: self.config.log_path_for(&run_id.to_string()),
                flush_every: self.config.flush_every,
                console: self.config.console,
            },
        );
        RunSession::new(run_id, journal)
    }

    /// Run the command to completion.
    ///
    /// The full log is flushed before a nonzero exit is returned as
    /// [`RunnerError::RunFailed`]. Spawn failures return before any
    /// finalization.
    pub async fn run(&self, command: &CommandSpec) -> Result<RunSession> {
        let mut session = self.session();

        info!(
            run_id = %session.run_id,
            command = %command.display(),
            log_path = %session.journal.log_path(),
            "starting dbt run"
        );

        session.journal.info("Starting dbt run").await;
        session
            .journal
            .info(format!("Executing: {}", command.display()))
            .await;

        let (mut child, output) = spawn_merged(command)?;

        self.stream(&mut session, output).await;

        let code = match child.wait().await {
            Ok(status) => exit_code(status),
            Err(e) => {
                error!(run_id = %session.run_id, error = %e, "failed waiting for dbt");
                session
                    .journal
                    .error(format!("Failed waiting for dbt: {}", e))
                    .await;
                UNKNOWN_EXIT_CODE
            }
        };

        self.complete(session, code).await
    }

    /// Feed every line of `output` through the journal and classifier
    pub async fn stream<R>(&self, session: &mut RunSession, mut output: R)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();
        let mut lines = 0usize;

        loop {
            buf.clear();
            match output.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let (message, terminator) = split_terminator(&line);

                    session.journal.log(message, Level::Info, terminator).await;
                    session.observe(message);
                    lines += 1;
                }
                Err(e) => {
                    error!(run_id = %session.run_id, error = %e, "failed reading dbt output");
                    session
                        .journal
                        .error(format!("Failed reading dbt output: {}", e))
                        .await;
                    break;
                }
            }
        }

        debug!(run_id = %session.run_id, lines, failure = ?session.failure, "output stream ended");
    }

    /// Record the exit code, finalize, and fail on nonzero exit
    pub async fn complete(&self, mut session: RunSession, code: i32) -> Result<RunSession> {
        session.exit_code = Some(code);

        if code != 0 {
            session.success = false;
            session
                .journal
                .error(format!("dbt exited with return code {}", code))
                .await;
        }

        self.finish(&mut session).await;

        info!(
            run_id = %session.run_id,
            success = session.success,
            exit_code = code,
            failure = ?session.failure,
            duration_secs = session.duration.map(|d| d.as_secs_f64()),
            "dbt run finished"
        );

        if !session.success {
            return Err(RunnerError::RunFailed {
                code,
                summary: Box::new(session.summary()),
            });
        }

        Ok(session)
    }

    /// Flush, append the summary block, flush again
    async fn finish(&self, session: &mut RunSession) {
        session.journal.flush().await;

        let duration = session.elapsed();
        session.duration = Some(duration);

        let separator = "=".repeat(SEPARATOR_WIDTH);
        let journal = &mut session.journal;

        journal.info("").await;
        journal.info(separator.as_str()).await;
        journal.info("Run Finished").await;
        journal
            .info(format!(
                "Success: {}",
                if session.success { "True" } else { "False" }
            ))
            .await;
        journal
            .info(format!("Duration: {:.1}s", duration.as_secs_f64()))
            .await;

        if let Some(failure) = session.failure {
            journal.error(format!("Failure type: {}", failure)).await;
        }

        journal.info(separator).await;
        journal.flush().await;
    }
}

/// Exit code of a finished child; a signal N is reported as -N
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    UNKNOWN_EXIT_CODE
}

/// Split a raw line into its message and trailing newline
fn split_terminator(line: &str) -> (&str, &'static str) {
    if let Some(message) = line.strip_suffix("\r\n") {
        (message, "\n")
    } else if let Some(message) = line.strip_suffix('\n') {
        (message, "\n")
    } else {
        (line, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FailureCategory;
    use crate::journal::Console;
    use crate::sink::MemorySink;

    fn runner(sink: Arc<MemorySink>, flush_every: usize) -> Runner {
        Runner::new(
            sink,
            RunnerConfig {
                log_path: "logs/{run_id}.log".to_string(),
                flush_every,
                console: Console::Silent,
            },
        )
    }

    #[test]
    fn test_split_terminator() {
        assert_eq!(split_terminator("done\n"), ("done", "\n"));
        assert_eq!(split_terminator("done\r\n"), ("done", "\n"));
        assert_eq!(split_terminator("partial"), ("partial", ""));
        assert_eq!(split_terminator("\n"), ("", "\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_from_signal() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait status: low byte is the terminating signal
        assert_eq!(exit_code(ExitStatus::from_raw(9)), -9);
        assert_eq!(exit_code(ExitStatus::from_raw(15)), -15);
        // Normal exit code lives in the second byte
        assert_eq!(exit_code(ExitStatus::from_raw(2 << 8)), 2);
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
    }

    #[tokio::test]
    async fn test_session_log_path_uses_run_id() {
        let runner = runner(Arc::new(MemorySink::new()), 25);
        let session = runner.session();
        assert_eq!(
            session.journal.log_path(),
            format!("logs/{}.log", session.run_id)
        );
    }

    #[tokio::test]
    async fn test_stream_and_fail() {
        let sink = Arc::new(MemorySink::new());
        let runner = runner(sink.clone(), 25);
        let mut session = runner.session();

        let output: &[u8] = b"Compilation Error: syntax\nFAIL 3 tests\n";
        runner.stream(&mut session, output).await;
        assert_eq!(session.failure, Some(FailureCategory::Compilation));

        let result = runner.complete(session, 1).await;
        let Err(RunnerError::RunFailed { code, summary }) = result else {
            panic!("Nonzero exit should fail the run");
        };
        assert_eq!(code, 1);
        assert!(!summary.success);
        assert_eq!(summary.failure, Some(FailureCategory::Compilation));

        let log = sink.last_content().unwrap();
        assert!(log.contains("[INFO] Compilation Error: syntax\n"));
        assert!(log.contains("[ERROR] dbt exited with return code 1\n"));
        assert!(log.contains("Run Finished"));
        assert!(log.contains("Success: False"));
        assert!(log.contains("[ERROR] Failure type: COMPILATION\n"));
        assert!(log.ends_with(&format!("[INFO] {}\n", "=".repeat(40))));
    }

    #[tokio::test]
    async fn test_exit_zero_succeeds_despite_failure_lines() {
        let sink = Arc::new(MemorySink::new());
        let runner = runner(sink.clone(), 25);
        let mut session = runner.session();

        let output: &[u8] = b"Done. PASS=4 WARN=0 ERROR=0 SKIP=0\nFAILOVER disabled\n";
        runner.stream(&mut session, output).await;

        let session = runner.complete(session, 0).await.unwrap();
        assert!(session.success);
        assert_eq!(session.failure, Some(FailureCategory::TestFailure));
        assert_eq!(session.exit_code, Some(0));
        assert!(session.duration.is_some());

        let log = sink.last_content().unwrap();
        assert!(log.contains("Success: True"));
        assert!(log.contains("Failure type: TEST_FAILURE"));
        assert!(!log.contains("return code"));
    }

    #[tokio::test]
    async fn test_summary_block_layout() {
        let sink = Arc::new(MemorySink::new());
        let runner = runner(sink.clone(), 25);
        let mut session = runner.session();

        let output: &[u8] = b"OK\n";
        runner.stream(&mut session, output).await;
        runner.complete(session, 0).await.unwrap();

        let log = sink.last_content().unwrap();
        // "[ts] [INFO] message" -> "message"
        let messages: Vec<&str> = log
            .lines()
            .filter_map(|l| l.split_once("] [INFO] ").map(|(_, m)| m))
            .collect();
        let tail = &messages[messages.len() - 6..];

        let separator = "=".repeat(40);
        assert_eq!(tail[0], "");
        assert_eq!(tail[1], separator);
        assert_eq!(tail[2], "Run Finished");
        assert_eq!(tail[3], "Success: True");
        assert!(tail[4].starts_with("Duration: ") && tail[4].ends_with('s'));
        assert_eq!(tail[5], separator);
    }

    #[tokio::test]
    async fn test_read_error_still_finalizes() {
        let sink = Arc::new(MemorySink::new());
        let runner = runner(sink.clone(), 25);
        let mut session = runner.session();

        let output = tokio_test::io::Builder::new()
            .read(b"Runtime Error in rpc\n")
            .read_error(std::io::Error::other("pipe closed"))
            .build();
        runner
            .stream(&mut session, tokio::io::BufReader::new(output))
            .await;
        assert_eq!(session.failure, Some(FailureCategory::Runtime));

        let result = runner.complete(session, 2).await;
        assert!(matches!(result, Err(RunnerError::RunFailed { code: 2, .. })));

        let log = sink.last_content().unwrap();
        assert!(log.contains("[ERROR] Failed reading dbt output: pipe closed"));
        assert!(log.contains("Run Finished"));
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_run() {
        let sink = Arc::new(MemorySink::failing());
        let runner = runner(sink.clone(), 1);
        let mut session = runner.session();

        let output: &[u8] = b"line one\nline two\n";
        runner.stream(&mut session, output).await;

        let session = runner.complete(session, 0).await.unwrap();
        assert!(session.success);
        assert_eq!(sink.write_count(), 0);
        assert!(session.journal.persisted().contains("Run Finished"));
    }
}
