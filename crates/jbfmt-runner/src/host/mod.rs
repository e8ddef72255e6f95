//! Editor-facing commands built on the format orchestrator.
//!
//! The editor itself is not modelled here. Hosts supply the active file or
//! selected directory, a [`DocumentSnapshot`] for formatting providers, and
//! a [`Notifier`] that surfaces messages to the user. [`EditorCommands`]
//! turns orchestrator results into those messages and into
//! [`lsp_types::TextEdit`] values.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use jbfmt_config::Config;
use lsp_types::{Position, Range, TextEdit};
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{CommandError, FormatError};
use crate::orchestrator::FormatOrchestrator;
use crate::process::FormatterExecutor;
use crate::request::{FormatReport, FormatWarning};

/// Tracing target for editor command handling.
const HOST_TARGET: &str = "jbfmt_runner::host";

/// A user-visible message raised by an editor command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notice {
    /// Informational message.
    Info(String),
    /// Something went wrong but the request still completed.
    Warning(String),
    /// The request failed.
    Error(String),
}

impl Notice {
    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Info(message) | Self::Warning(message) | Self::Error(message) => message,
        }
    }

    /// Returns the severity label.
    #[must_use]
    pub const fn level(&self) -> &'static str {
        match self {
            Self::Info(_) => "info",
            Self::Warning(_) => "warning",
            Self::Error(_) => "error",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.level(), self.message())
    }
}

/// Sink for user-visible notices.
pub trait Notifier {
    /// Shows `notice` to the user.
    fn notify(&self, notice: Notice);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Notifier that keeps every notice in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of the recorded notices.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the recorded notices.
    #[must_use]
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(
            &mut *self
                .notices
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notice);
    }
}

/// The text of an open document at the moment formatting was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    path: PathBuf,
    text: String,
}

impl DocumentSnapshot {
    /// Captures the buffer `text` of the document backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// File backing the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Buffer text before formatting.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

/// Returns the range covering all of `text`, in UTF-16 code units.
#[must_use]
pub fn full_range(text: &str) -> Range {
    let line = text.matches('\n').count();
    let last_line = text.rsplit('\n').next().unwrap_or_default();
    let character = last_line.encode_utf16().count();
    Range::new(
        Position::new(0, 0),
        Position::new(saturating_u32(line), saturating_u32(character)),
    )
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Editor commands backed by a [`FormatOrchestrator`].
#[derive(Debug)]
pub struct EditorCommands<E, N> {
    orchestrator: FormatOrchestrator<E>,
    notifier: N,
}

impl<E, N> EditorCommands<E, N> {
    /// Wraps `orchestrator`, reporting to `notifier`.
    #[must_use]
    pub const fn new(orchestrator: FormatOrchestrator<E>, notifier: N) -> Self {
        Self {
            orchestrator,
            notifier,
        }
    }

    /// Returns the wrapped orchestrator.
    #[must_use]
    pub const fn orchestrator(&self) -> &FormatOrchestrator<E> {
        &self.orchestrator
    }

    /// Returns the notifier.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<E: FormatterExecutor, N: Notifier> EditorCommands<E, N> {
    /// Formats the file shown in the active editor.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NoActiveEditor`] when `active` is `None` and
    /// [`CommandError::Format`] when formatting fails. Both are also sent to
    /// the notifier.
    pub fn format_active_file(
        &self,
        active: Option<&Path>,
        config: &Config,
    ) -> Result<FormatReport, CommandError> {
        let Some(path) = active else {
            return Err(self.reject(CommandError::NoActiveEditor));
        };
        let report = self
            .orchestrator
            .format_file(path, config)
            .map_err(|err| self.fail(err))?;
        self.forward_warnings(&report);
        Ok(report)
    }

    /// Formats the directory selected in the explorer.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NoDirectorySelected`] when `selected` is
    /// `None` and [`CommandError::Format`] when formatting fails.
    pub fn format_directory(
        &self,
        selected: Option<&Path>,
        config: &Config,
    ) -> Result<FormatReport, CommandError> {
        let Some(path) = selected else {
            return Err(self.reject(CommandError::NoDirectorySelected));
        };
        let report = self
            .orchestrator
            .format_directory(path, config)
            .map_err(|err| self.fail(err))?;
        self.forward_warnings(&report);
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        self.notifier
            .notify(Notice::Info(format!("Directory formatted: {name}")));
        Ok(report)
    }

    /// Document formatting provider: formats the document's file and
    /// returns a single edit replacing the whole pre-format buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Format`] when formatting or the re-read
    /// fails.
    pub fn provide_document_edits(
        &self,
        document: &DocumentSnapshot,
        config: &Config,
    ) -> Result<Vec<TextEdit>, CommandError> {
        let report = self
            .orchestrator
            .format_file(document.path(), config)
            .map_err(|err| self.fail(err))?;
        self.forward_warnings(&report);
        let Some(content) = report.into_content() else {
            return Ok(Vec::new());
        };
        Ok(vec![TextEdit::new(full_range(document.text()), content)])
    }

    /// Pre-save hook. Does nothing unless `format_on_save` is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Format`] when formatting fails. The failure
    /// is logged and sent to the notifier like any other format command.
    pub fn on_will_save(
        &self,
        path: &Path,
        config: &Config,
    ) -> Result<Option<FormatReport>, CommandError> {
        if !config.format_on_save() {
            debug!(
                target: HOST_TARGET,
                path = %path.display(),
                "format on save disabled"
            );
            return Ok(None);
        }
        match self.orchestrator.format_file(path, config) {
            Ok(report) => {
                self.forward_warnings(&report);
                Ok(Some(report))
            }
            Err(err) => {
                error!(
                    target: HOST_TARGET,
                    path = %path.display(),
                    error = %err,
                    "format on save failed"
                );
                Err(self.fail(err))
            }
        }
    }

    fn reject(&self, err: CommandError) -> CommandError {
        self.notifier.notify(Notice::Error(err.to_string()));
        err
    }

    fn fail(&self, err: FormatError) -> CommandError {
        let message = match &err {
            FormatError::ReadBack { .. } => err.to_string(),
            other => format!("Formatting failed: {other}"),
        };
        self.notifier.notify(Notice::Error(message));
        CommandError::Format(err)
    }

    fn forward_warnings(&self, report: &FormatReport) {
        for warning in report.warnings() {
            let FormatWarning::Permissions { message, .. } = warning;
            self.notifier.notify(Notice::Warning(format!(
                "Failed to set formatter permissions: {message}"
            )));
        }
    }
}
