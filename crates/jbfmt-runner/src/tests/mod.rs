//! Shared test doubles and crate-level behaviour tests.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};

use jbfmt_config::Config;
use mockall::mock;
use tempfile::TempDir;

use crate::error::FormatError;
use crate::process::{FormatterExecutor, Invocation};
use crate::request::ProcessOutcome;


mock! {
    pub Executor {}
    impl FormatterExecutor for Executor {
        fn execute(&self, invocation: &Invocation) -> Result<ProcessOutcome, FormatError>;
    }
}

/// Executor that rewrites the last argument (the target) like the real
/// formatter would, counting launches.
pub(crate) struct RewritingExecutor {
    calls: AtomicUsize,
    exit_code: i32,
    stderr: String,
    rewrite: Option<Vec<u8>>,
    last_args: Mutex<Vec<OsString>>,
}

impl RewritingExecutor {
    /// Succeeds and writes `content` into the target file. Directory
    /// targets are left alone.
    pub(crate) fn writing(content: impl Into<Vec<u8>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            exit_code: 0,
            stderr: String::new(),
            rewrite: Some(content.into()),
            last_args: Mutex::new(Vec::new()),
        }
    }

    /// Succeeds without touching the target.
    pub(crate) fn untouched() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            exit_code: 0,
            stderr: String::new(),
            rewrite: None,
            last_args: Mutex::new(Vec::new()),
        }
    }

    /// Exits with `code` and `stderr`, leaving the target unchanged.
    pub(crate) fn failing(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            exit_code: code,
            stderr: stderr.into(),
            rewrite: None,
            last_args: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_args(&self) -> Vec<OsString> {
        self.last_args
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

impl FormatterExecutor for RewritingExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutcome, FormatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_args
            .lock()
            .unwrap_or_else(|poison| poison.into_inner()) = invocation.args().to_vec();
        let target = invocation
            .args()
            .last()
            .map(Path::new)
            .filter(|path| path.is_file());
        if let (Some(content), Some(target)) = (&self.rewrite, target) {
            fs::write(target, content).map_err(|err| FormatError::Io {
                source: std::sync::Arc::new(err),
            })?;
        }
        Ok(ProcessOutcome::new(
            self.exit_code,
            "Formatting done.\n",
            self.stderr.clone(),
        ))
    }
}

/// Executor that parks inside `execute` until released, so tests can
/// observe the busy guard from another thread.
pub(crate) struct BlockingExecutor {
    calls: AtomicUsize,
    started: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl BlockingExecutor {
    /// Returns the executor with the `started` receiver and `release` sender.
    pub(crate) fn new() -> (Self, Receiver<()>, Sender<()>) {
        let (started_tx, started_rx) = channel();
        let (release_tx, release_rx) = channel();
        let executor = Self {
            calls: AtomicUsize::new(0),
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        };
        (executor, started_rx, release_tx)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FormatterExecutor for BlockingExecutor {
    fn execute(&self, _invocation: &Invocation) -> Result<ProcessOutcome, FormatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .send(())
            .expect("test is listening for start");
        self.release
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .recv()
            .expect("test releases the executor");
        Ok(ProcessOutcome::new(0, "", ""))
    }
}

/// Scratch workspace with a formatter script and a source file.
pub(crate) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("format.sh"), "#!/bin/sh\nexit 0\n").expect("write script");
        fs::create_dir(dir.path().join("src")).expect("create src");
        fs::write(dir.path().join("src/Main.java"), "class Main{}\n").expect("write source");
        Self { dir }
    }

    /// Formatter base path without a suffix.
    pub(crate) fn formatter_base(&self) -> String {
        self.dir
            .path()
            .join("format")
            .to_str()
            .expect("utf-8 temp path")
            .to_owned()
    }

    pub(crate) fn formatter_script(&self) -> PathBuf {
        self.dir.path().join("format.sh")
    }

    pub(crate) fn source_file(&self) -> PathBuf {
        self.dir.path().join("src/Main.java")
    }

    pub(crate) fn source_dir(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn config(&self) -> Config {
        Config {
            format_sh_path: self.formatter_base(),
            ..Config::default()
        }
    }
}
