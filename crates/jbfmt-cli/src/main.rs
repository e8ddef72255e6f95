//! CLI entrypoint for the `jbfmt` formatter bridge.
//!
//! The binary delegates to [`jbfmt_cli::run`], which loads configuration,
//! parses the subcommand, runs the external formatter, and renders the
//! result.

use std::io::{self, IsTerminal, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdout_is_terminal = io::stdout().is_terminal();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    // Unlocked: the tracing subscriber and the drain threads also write here.
    let mut stderr = io::stderr();
    jbfmt_cli::run(
        std::env::args_os(),
        &mut stdout,
        &mut stderr,
        stdout_is_terminal,
    )
}
