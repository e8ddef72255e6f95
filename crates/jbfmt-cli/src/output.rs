//! Rendering of format reports for terminals and pipelines.

use std::io::Write;

use clap::ValueEnum;
use jbfmt_runner::{FormatReport, Notice};
use lsp_types::TextEdit;
use serde::Serialize;

use crate::errors::AppError;

/// Output format selection for command reports.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render human-readable output.
    Human,
    /// Always emit JSON.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Human-readable output.
    Human,
    /// JSON documents.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto if stdout_is_terminal => ResolvedOutputFormat::Human,
            Self::Auto | Self::Json => ResolvedOutputFormat::Json,
            Self::Human => ResolvedOutputFormat::Human,
        }
    }
}

/// Writes a report. Human output is the formatter's own stdout, or the
/// refreshed file contents when `print_content` is set.
pub(crate) fn write_report<W: Write>(
    writer: &mut W,
    report: &FormatReport,
    format: ResolvedOutputFormat,
    print_content: bool,
) -> Result<(), AppError> {
    match format {
        ResolvedOutputFormat::Json => write_json(writer, report),
        ResolvedOutputFormat::Human => {
            let text = if print_content {
                report.content().unwrap_or_default()
            } else {
                report.outcome().stdout()
            };
            writer
                .write_all(text.as_bytes())
                .and_then(|()| writer.flush())
                .map_err(AppError::WriteOutput)
        }
    }
}

/// Writes an optional report; `None` renders as JSON `null` and as nothing
/// for humans.
pub(crate) fn write_optional_report<W: Write>(
    writer: &mut W,
    report: Option<&FormatReport>,
    format: ResolvedOutputFormat,
) -> Result<(), AppError> {
    match (report, format) {
        (Some(found), _) => write_report(writer, found, format, false),
        (None, ResolvedOutputFormat::Json) => write_json(writer, &Option::<FormatReport>::None),
        (None, ResolvedOutputFormat::Human) => Ok(()),
    }
}

/// Edits are always JSON: they are consumed by editor integrations.
pub(crate) fn write_edits<W: Write>(writer: &mut W, edits: &[TextEdit]) -> Result<(), AppError> {
    write_json(writer, edits)
}

/// Writes one notice per line.
pub(crate) fn write_notices<W: Write>(writer: &mut W, notices: &[Notice]) -> Result<(), AppError> {
    for notice in notices {
        writeln!(writer, "{notice}").map_err(AppError::WriteOutput)?;
    }
    writer.flush().map_err(AppError::WriteOutput)
}

fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(AppError::SerialiseOutput)?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(AppError::WriteOutput)
}
