//! Subprocess execution for the external formatter.
//!
//! [`SystemExecutor`] implements [`FormatterExecutor`] by spawning the
//! formatter with an explicit argument vector (never through a shell),
//! draining stdout and stderr on background threads so the child never
//! blocks on a full pipe, and waiting for exit with an optional timeout.

use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::FormatError;
use crate::request::ProcessOutcome;

/// Tracing target for formatter process operations.
const PROCESS_TARGET: &str = "jbfmt_runner::process";

/// Interval between exit polls while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A fully resolved formatter launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl Invocation {
    /// Creates an invocation without a timeout.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    /// Bounds the run; `None` waits indefinitely.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executable to launch.
    #[must_use]
    pub fn program(&self) -> &Path {
        self.program.as_path()
    }

    /// Arguments passed verbatim to the executable.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Optional upper bound on the run.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Trait abstracting formatter process execution for testability.
///
/// The production implementation is [`SystemExecutor`]. Test code can
/// implement this trait to count launches or return canned outcomes without
/// spawning real processes.
pub trait FormatterExecutor {
    /// Runs the formatter to completion.
    ///
    /// A non-zero exit is not an error at this level; it is reported through
    /// the returned [`ProcessOutcome`].
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::SpawnFailed`] when the process cannot start,
    /// [`FormatError::Timeout`] when it outlives the invocation timeout, and
    /// [`FormatError::Io`] when waiting on it fails.
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutcome, FormatError>;
}

impl<T: FormatterExecutor + ?Sized> FormatterExecutor for &T {
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutcome, FormatError> {
        (**self).execute(invocation)
    }
}

/// Executes the formatter as a real child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl FormatterExecutor for SystemExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutcome, FormatError> {
        let mut child = spawn(invocation)?;
        let stdout = child.stdout.take().map(|pipe| drain(pipe, "stdout"));
        let stderr = child.stderr.take().map(|pipe| drain(pipe, "stderr"));

        // On timeout the drain threads are detached: a killed script may
        // leave grandchildren holding the pipes open.
        let status = wait_for_exit(&mut child, invocation.timeout())?;
        let stdout_text = collect(stdout);
        let stderr_text = collect(stderr);

        let exit_code = status.code().unwrap_or(-1);
        debug!(
            target: PROCESS_TARGET,
            exit_code,
            stdout_bytes = stdout_text.len(),
            stderr_bytes = stderr_text.len(),
            "formatter process exited"
        );
        Ok(ProcessOutcome::new(exit_code, stdout_text, stderr_text))
    }
}

fn spawn(invocation: &Invocation) -> Result<Child, FormatError> {
    let mut command = Command::new(invocation.program());
    command
        .args(invocation.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = command.spawn().map_err(|err| FormatError::SpawnFailed {
        path: invocation.program().to_path_buf(),
        source: Arc::new(err),
    })?;

    debug!(
        target: PROCESS_TARGET,
        pid = child.id(),
        executable = %invocation.program().display(),
        "formatter process spawned"
    );
    Ok(child)
}

/// Accumulates a pipe into a string on a background thread, logging each
/// line as it arrives.
fn drain<R>(pipe: R, stream: &'static str) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut accumulated = String::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let chunk = String::from_utf8_lossy(&line);
                    debug!(
                        target: PROCESS_TARGET,
                        stream,
                        line = %chunk.trim_end(),
                        "formatter output"
                    );
                    accumulated.push_str(&chunk);
                }
                Err(err) => {
                    warn!(
                        target: PROCESS_TARGET,
                        stream,
                        error = %err,
                        "failed to read formatter output"
                    );
                    break;
                }
            }
        }
        accumulated
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|thread| thread.join().ok())
        .unwrap_or_default()
}

/// Waits for the child to exit, killing it once the timeout elapses. A zero
/// timeout waits indefinitely.
fn wait_for_exit(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus, FormatError> {
    let Some(limit) = timeout.filter(|limit| !limit.is_zero()) else {
        return child.wait().map_err(io_error);
    };

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if start.elapsed() >= limit => {
                warn!(
                    target: PROCESS_TARGET,
                    timeout_secs = limit.as_secs(),
                    "formatter timed out, killing process"
                );
                drop(child.kill());
                drop(child.wait());
                return Err(FormatError::Timeout {
                    timeout_secs: limit.as_secs(),
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(err) => return Err(io_error(err)),
        }
    }
}

fn io_error(err: io::Error) -> FormatError {
    FormatError::Io {
        source: Arc::new(err),
    }
}
