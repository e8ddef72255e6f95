//! Command-line runtime for the `jbfmt` formatter bridge.
//!
//! The runtime splits configuration flags from the subcommand, loads
//! [`jbfmt_config::Config`] through `ortho_config`, installs telemetry, and
//! dispatches to the editor commands in [`jbfmt_runner::host`]. Notices are
//! written to stderr; reports, file contents, and edits go to stdout.
//!
//! The IO streams, configuration loader, and formatter executor are all
//! injectable so the runtime can be exercised without spawning processes.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use jbfmt_config::Config;
use jbfmt_runner::charset::read_with_charset;
use jbfmt_runner::{
    DocumentSnapshot, EditorCommands, FormatOrchestrator, FormatterExecutor, Notice,
    RecordingNotifier, SystemExecutor,
};
use tracing::debug;

mod cli;
mod config;
mod errors;
pub mod output;
pub mod telemetry;

use cli::{Cli, CliCommand};
use config::{ConfigLoader, OrthoConfigLoader, command_arguments, split_config_arguments};
use errors::AppError;
use output::{ResolvedOutputFormat, write_edits, write_notices, write_optional_report, write_report};

pub use output::OutputFormat;

/// Tracing target for CLI dispatch.
const CLI_TARGET: &str = "jbfmt_cli";

const BARE_HELP: &str = "\
Usage: jbfmt [CONFIG FLAGS] [OPTIONS] <COMMAND> <PATH>

Commands:
  file      Format a single file
  dir       Format every matching file under a directory
  edits     Format a file and print the buffer edits as JSON
  pre-save  Run the format-on-save hook

Run 'jbfmt --help' for more information.
";

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    stdout: &'a mut W,
    stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E, stdout_is_terminal: bool) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }
}

struct CliRunner<'a, 'io, W: Write, E: Write, L: ConfigLoader, X> {
    io: &'a mut IoStreams<'io, W, E>,
    loader: &'a L,
    executor: X,
}

impl<W, E, L, X> CliRunner<'_, '_, W, E, L, X>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
    X: FormatterExecutor,
{
    fn run(self, args: Vec<OsString>) -> ExitCode {
        let Self {
            io,
            loader,
            executor,
        } = self;

        let split = split_config_arguments(&args);
        let result = Cli::try_parse_from(command_arguments(&args, &split))
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                if cli.is_bare_invocation() {
                    return io
                        .stderr
                        .write_all(BARE_HELP.as_bytes())
                        .map_err(AppError::WriteOutput)
                        .and(Err(AppError::BareInvocation));
                }
                loader
                    .load(&split.config_arguments)
                    .map(|config| (cli, config))
            })
            .and_then(|(cli, config)| {
                telemetry::initialise(&config)?;
                dispatch(cli, config, executor, io)
            });

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(AppError::CliUsage(error))
                if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
            {
                if write!(io.stdout, "{error}").is_err() {
                    return ExitCode::FAILURE;
                }
                ExitCode::SUCCESS
            }
            Err(error) => {
                if !error.is_notified() {
                    drop(writeln!(io.stderr, "{error}"));
                }
                ExitCode::FAILURE
            }
        }
    }
}

fn dispatch<W, E, X>(
    cli: Cli,
    mut config: Config,
    executor: X,
    io: &mut IoStreams<'_, W, E>,
) -> Result<(), AppError>
where
    W: Write,
    E: Write,
    X: FormatterExecutor,
{
    if cli.no_allow_defaults {
        config.allow_defaults = false;
    }
    if cli.no_recursive {
        config.recursive = false;
    }
    let format = cli.output.resolve(io.stdout_is_terminal);
    let Some(command) = cli.command else {
        return Err(AppError::BareInvocation);
    };
    debug!(target: CLI_TARGET, ?command, ?format, "dispatching command");

    let commands = EditorCommands::new(FormatOrchestrator::new(executor), RecordingNotifier::new());
    let result = execute(&commands, command, &config, format, &mut *io.stdout);
    let notices = commands.notifier().take();
    write_notices(&mut *io.stderr, &notices)?;
    let notified = notices
        .iter()
        .any(|notice| matches!(notice, Notice::Error(_)));
    match result {
        Err(AppError::Command(_)) if notified => Err(AppError::Reported),
        other => other,
    }
}

fn execute<X, W>(
    commands: &EditorCommands<X, RecordingNotifier>,
    command: CliCommand,
    config: &Config,
    format: ResolvedOutputFormat,
    stdout: &mut W,
) -> Result<(), AppError>
where
    X: FormatterExecutor,
    W: Write,
{
    match command {
        CliCommand::File { path, print } => {
            let report = commands.format_active_file(Some(&path), config)?;
            write_report(stdout, &report, format, print)
        }
        CliCommand::Dir { path } => {
            let report = commands.format_directory(Some(&path), config)?;
            write_report(stdout, &report, format, false)
        }
        CliCommand::Edits { path } => {
            let text =
                read_with_charset(&path, config.charset()).map_err(AppError::ReadDocument)?;
            let edits = commands.provide_document_edits(&DocumentSnapshot::new(path, text), config)?;
            write_edits(stdout, &edits)
        }
        CliCommand::PreSave { path } => {
            let report = commands.on_will_save(&path, config)?;
            write_optional_report(stdout, report.as_ref(), format)
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E, stdout_is_terminal: bool) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr, stdout_is_terminal);
    run_with(args, &mut io, &OrthoConfigLoader, SystemExecutor)
}

/// Runs the CLI with a custom configuration loader and executor.
pub(crate) fn run_with<I, W, E, L, X>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
    executor: X,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
    X: FormatterExecutor,
{
    CliRunner {
        io,
        loader,
        executor,
    }
    .run(args.into_iter().collect())
}
