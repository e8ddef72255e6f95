//! Ephemeral values exchanged with the format orchestrator.
//!
//! None of these types outlive a single request: a [`FormatRequest`] is
//! built per user action or save event, a [`ProcessOutcome`] per subprocess
//! run, and a [`FormatReport`] is handed back to the host once.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Whether a request targets a single file or a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A single file whose buffer is refreshed after formatting.
    File,
    /// A directory formatted in place; no buffer is refreshed.
    Directory,
}

impl TargetKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request to run the formatter against a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatRequest {
    target: PathBuf,
    kind: TargetKind,
}

impl FormatRequest {
    /// Creates a request for `target`.
    #[must_use]
    pub fn new(target: impl Into<PathBuf>, kind: TargetKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }

    /// Creates a single-file request.
    #[must_use]
    pub fn file(target: impl Into<PathBuf>) -> Self {
        Self::new(target, TargetKind::File)
    }

    /// Creates a directory request.
    #[must_use]
    pub fn directory(target: impl Into<PathBuf>) -> Self {
        Self::new(target, TargetKind::Directory)
    }

    /// Returns the filesystem target.
    #[must_use]
    pub fn target(&self) -> &Path {
        self.target.as_path()
    }

    /// Returns the request kind.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        self.kind
    }
}

/// Exit status and captured streams of one formatter run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl ProcessOutcome {
    /// Creates an outcome from an exit code and captured text.
    #[must_use]
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Exit code, `-1` when the process ended without one.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns true when the formatter exited with code 0.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Captured standard output.
    #[must_use]
    pub fn stdout(&self) -> &str {
        self.stdout.as_str()
    }

    /// Captured standard error.
    #[must_use]
    pub fn stderr(&self) -> &str {
        self.stderr.as_str()
    }
}

/// Non-fatal condition observed while serving a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatWarning {
    /// The formatter script could not be marked executable.
    Permissions {
        /// Resolved executable path.
        path: PathBuf,
        /// Error reported by the filesystem.
        message: String,
    },
}

impl std::fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permissions { path, message } => write!(
                f,
                "Failed to set formatter permissions on '{}': {message}",
                path.display()
            ),
        }
    }
}

/// Result of a successful format request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    request: FormatRequest,
    executable: PathBuf,
    outcome: ProcessOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<FormatWarning>,
}

impl FormatReport {
    pub(crate) const fn new(
        request: FormatRequest,
        executable: PathBuf,
        outcome: ProcessOutcome,
        content: Option<String>,
        warnings: Vec<FormatWarning>,
    ) -> Self {
        Self {
            request,
            executable,
            outcome,
            content,
            warnings,
        }
    }

    /// The request this report answers.
    #[must_use]
    pub const fn request(&self) -> &FormatRequest {
        &self.request
    }

    /// Resolved formatter path that was launched.
    #[must_use]
    pub fn executable(&self) -> &Path {
        self.executable.as_path()
    }

    /// Exit status and output of the formatter run.
    #[must_use]
    pub const fn outcome(&self) -> &ProcessOutcome {
        &self.outcome
    }

    /// Reformatted file text, present for file requests only.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Consumes the report and returns the reformatted file text.
    #[must_use]
    pub fn into_content(self) -> Option<String> {
        self.content
    }

    /// Non-fatal conditions observed during the run.
    #[must_use]
    pub fn warnings(&self) -> &[FormatWarning] {
        &self.warnings
    }
}
