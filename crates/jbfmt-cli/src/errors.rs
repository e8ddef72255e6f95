//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use jbfmt_runner::{CommandError, FormatError};
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    /// Sentinel for bare invocation; help has already been written.
    #[error("bare invocation")]
    BareInvocation,
    /// Sentinel for a command failure already written as a notice.
    #[error("command failed")]
    Reported,
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read document: {0}")]
    ReadDocument(FormatError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}

impl AppError {
    /// Returns true when the failure has already been shown to the user as
    /// a notice.
    pub(crate) const fn is_notified(&self) -> bool {
        matches!(self, Self::BareInvocation | Self::Reported)
    }
}
