//! Domain errors raised while formatting a target.
//!
//! All errors use `thiserror`-derived enums with structured context so hosts
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from a single format request.
///
/// Every variant is terminal for the request that produced it; nothing is
/// retried.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Another request is already running on this orchestrator.
    #[error("a format request is already running; '{target}' was not formatted")]
    Busy {
        /// Target of the rejected request.
        target: PathBuf,
    },

    /// The formatter path is empty after trimming.
    #[error(
        "formatter path not set; configure `format_sh_path` (formatShPath) to point at the \
         JetBrains format script"
    )]
    NotConfigured,

    /// The resolved formatter path does not exist.
    #[error("Formatter path does not exist: {}", path.display())]
    ExecutableNotFound {
        /// Resolved path that was checked.
        path: PathBuf,
    },

    /// The operating system refused to start the formatter.
    #[error("failed to start formatter '{}': {source}", path.display())]
    SpawnFailed {
        /// Resolved executable path.
        path: PathBuf,
        /// Underlying spawn error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The formatter ran but reported failure.
    #[error("Command exited with code {code}. {stderr}")]
    NonZeroExit {
        /// Exit code, or `-1` when the process was terminated by a signal.
        code: i32,
        /// Standard error captured from the formatter.
        stderr: String,
    },

    /// The formatter did not finish within the configured timeout.
    #[error("formatter timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// Waiting on or collecting output from the formatter failed.
    #[error("I/O error while running the formatter: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The configured charset label is not known.
    #[error("unsupported charset '{charset}'")]
    UnsupportedCharset {
        /// Label taken from the configuration.
        charset: String,
    },

    /// The formatter succeeded but the file could not be read back.
    #[error("Failed to refresh file '{}': {message}", path.display())]
    ReadBack {
        /// File that was re-read.
        path: PathBuf,
        /// Human-readable failure description.
        message: String,
        /// Optional underlying I/O error.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },
}

impl FormatError {
    /// Returns true when the error stems from configuration rather than from
    /// running the formatter.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured | Self::ExecutableNotFound { .. } | Self::UnsupportedCharset { .. }
        )
    }
}

/// Errors returned by the editor commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Format File was invoked without an active editor.
    #[error("No active editor")]
    NoActiveEditor,

    /// Format Directory was invoked without a selected directory.
    #[error("No directory selected")]
    NoDirectorySelected,

    /// The format request itself failed.
    #[error(transparent)]
    Format(#[from] FormatError),
}
