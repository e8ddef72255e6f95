//! Runs the JetBrains command-line formatter on behalf of an editor.
//!
//! The crate resolves the configured formatter script for the host
//! platform, launches it with an argument vector built from [`Config`]
//! (never through a shell), and for single files re-reads the rewritten file
//! in the configured character set so the editor can refresh its buffer.
//!
//! A per-orchestrator [`BusyGuard`] rejects overlapping requests. The
//! [`host`] module layers editor commands (notifications, document edits,
//! and the pre-save hook) on top of [`FormatOrchestrator`].
//!
//! [`Config`]: jbfmt_config::Config

pub mod arguments;
pub mod charset;
pub mod error;
pub mod executable;
pub mod guard;
pub mod host;
pub mod orchestrator;
pub mod process;
pub mod request;

#[cfg(test)]
mod tests;

pub use error::{CommandError, FormatError};
pub use executable::Platform;
pub use guard::{BusyGuard, BusyPermit};
pub use host::{DocumentSnapshot, EditorCommands, Notice, Notifier, RecordingNotifier, full_range};
pub use orchestrator::FormatOrchestrator;
pub use process::{FormatterExecutor, Invocation, SystemExecutor};
pub use request::{FormatReport, FormatRequest, FormatWarning, ProcessOutcome, TargetKind};
