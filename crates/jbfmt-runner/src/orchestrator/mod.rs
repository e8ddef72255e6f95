//! Format orchestration: one request, one formatter run.
//!
//! [`FormatOrchestrator::format_target`] executes the whole linear recipe:
//! claim the busy guard, resolve and check the executable, build the
//! argument vector, mark the script executable, launch it through the
//! [`FormatterExecutor`], and for single files re-read the rewritten file so
//! the host can replace its stale buffer.

use std::io;
use std::path::Path;

use jbfmt_config::Config;
use tracing::{debug, info, warn};

use crate::arguments::{build_arguments, display_command_line};
use crate::charset::{encoding_for, read_with_charset};
use crate::error::FormatError;
use crate::executable::{Platform, ensure_exists, mark_executable, resolve_executable};
use crate::guard::BusyGuard;
use crate::process::{FormatterExecutor, Invocation};
use crate::request::{FormatReport, FormatRequest, FormatWarning, TargetKind};

/// Tracing target for orchestration.
const ORCHESTRATOR_TARGET: &str = "jbfmt_runner::orchestrator";

/// Runs the external formatter against files and directories.
///
/// The orchestrator owns its [`BusyGuard`], so separate instances never
/// block each other.
///
/// # Example
///
/// ```rust,no_run
/// use jbfmt_config::Config;
/// use jbfmt_runner::{FormatOrchestrator, FormatRequest, SystemExecutor};
///
/// let config = Config {
///     format_sh_path: String::from("/opt/idea/bin/format"),
///     ..Config::default()
/// };
/// let orchestrator = FormatOrchestrator::new(SystemExecutor);
/// let report = orchestrator
///     .format_target(&FormatRequest::file("/work/src/Main.java"), &config)
///     .expect("formatting succeeds");
/// println!("{}", report.content().unwrap_or_default());
/// ```
#[derive(Debug)]
pub struct FormatOrchestrator<E> {
    executor: E,
    guard: BusyGuard,
    platform: Platform,
    mark_permissions: PermissionMarker,
}

/// Marks the resolved formatter script as executable before launch.
pub type PermissionMarker = fn(&Path) -> io::Result<()>;

impl<E> FormatOrchestrator<E> {
    /// Creates an orchestrator for the current platform.
    #[must_use]
    pub const fn new(executor: E) -> Self {
        Self::with_platform(executor, Platform::current())
    }

    /// Creates an orchestrator that resolves script suffixes for `platform`.
    #[must_use]
    pub const fn with_platform(executor: E, platform: Platform) -> Self {
        Self {
            executor,
            guard: BusyGuard::new(),
            platform,
            mark_permissions: mark_executable,
        }
    }

    /// Replaces the step that marks the script executable. A failing marker
    /// only adds a [`FormatWarning::Permissions`] to the report.
    #[must_use]
    pub const fn with_permission_marker(mut self, marker: PermissionMarker) -> Self {
        self.mark_permissions = marker;
        self
    }

    /// Returns true while a request is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Returns a reference to the executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: FormatterExecutor> FormatOrchestrator<E> {
    /// Formats a single file and returns its rewritten contents.
    ///
    /// # Errors
    ///
    /// See [`FormatOrchestrator::format_target`].
    pub fn format_file(&self, path: &Path, config: &Config) -> Result<FormatReport, FormatError> {
        self.format_target(&FormatRequest::file(path), config)
    }

    /// Formats every matching file under a directory.
    ///
    /// # Errors
    ///
    /// See [`FormatOrchestrator::format_target`].
    pub fn format_directory(
        &self,
        path: &Path,
        config: &Config,
    ) -> Result<FormatReport, FormatError> {
        self.format_target(&FormatRequest::directory(path), config)
    }

    /// Runs the formatter for one request.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Busy`] when another request holds the guard,
    /// [`FormatError::NotConfigured`] or [`FormatError::ExecutableNotFound`]
    /// before any launch, [`FormatError::UnsupportedCharset`] before a file
    /// launch whose charset label is unknown, any executor error,
    /// [`FormatError::NonZeroExit`] when the formatter reports failure, and
    /// [`FormatError::ReadBack`] when a formatted file cannot be re-read.
    pub fn format_target(
        &self,
        request: &FormatRequest,
        config: &Config,
    ) -> Result<FormatReport, FormatError> {
        let Some(_permit) = self.guard.try_acquire() else {
            warn!(
                target: ORCHESTRATOR_TARGET,
                target_path = %request.target().display(),
                "rejecting format request while another is running"
            );
            return Err(FormatError::Busy {
                target: request.target().to_path_buf(),
            });
        };

        let executable = resolve_executable(config.format_sh_path(), self.platform)?;
        ensure_exists(&executable)?;

        if request.kind() == TargetKind::File {
            encoding_for(config.charset())?;
        }

        let args = build_arguments(config, self.platform, &[request.target()]);

        let mut warnings = Vec::new();
        if let Err(err) = (self.mark_permissions)(&executable) {
            warn!(
                target: ORCHESTRATOR_TARGET,
                executable = %executable.display(),
                error = %err,
                "failed to set formatter permissions"
            );
            warnings.push(FormatWarning::Permissions {
                path: executable.clone(),
                message: err.to_string(),
            });
        }

        info!(
            target: ORCHESTRATOR_TARGET,
            kind = %request.kind(),
            command = %display_command_line(&executable, &args),
            "executing formatter"
        );
        let invocation = Invocation::new(executable.clone(), args).with_timeout(config.timeout());
        let outcome = self.executor.execute(&invocation)?;

        if !outcome.is_success() {
            warn!(
                target: ORCHESTRATOR_TARGET,
                exit_code = outcome.exit_code(),
                stderr = %outcome.stderr().trim(),
                "formatter reported failure"
            );
            return Err(FormatError::NonZeroExit {
                code: outcome.exit_code(),
                stderr: outcome.stderr().to_owned(),
            });
        }

        let content = match request.kind() {
            TargetKind::File => Some(read_with_charset(request.target(), config.charset())?),
            TargetKind::Directory => None,
        };

        debug!(
            target: ORCHESTRATOR_TARGET,
            target_path = %request.target().display(),
            refreshed_bytes = content.as_ref().map_or(0, String::len),
            "format request completed"
        );
        Ok(FormatReport::new(
            request.clone(),
            executable,
            outcome,
            content,
            warnings,
        ))
    }
}
