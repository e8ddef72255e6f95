//! Command-line argument definitions for `jbfmt`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Command-line interface for the JetBrains formatter bridge.
#[derive(Parser, Debug)]
#[command(name = "jbfmt", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Controls how reports are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// Omits `-allowDefaults` for this run.
    #[arg(long)]
    pub(crate) no_allow_defaults: bool,
    /// Omits `-r` for this run.
    #[arg(long)]
    pub(crate) no_recursive: bool,
    /// The editor command to run.
    #[command(subcommand)]
    pub(crate) command: Option<CliCommand>,
}

impl Cli {
    /// Returns true when no subcommand was supplied.
    pub(crate) const fn is_bare_invocation(&self) -> bool {
        self.command.is_none()
    }
}

/// Editor commands exposed on the command line.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Formats a single file, as the "Format File" editor command does.
    File {
        /// File to format.
        path: PathBuf,
        /// Writes the reformatted file contents to stdout.
        #[arg(long)]
        print: bool,
    },
    /// Formats every matching file under a directory.
    Dir {
        /// Directory to format.
        path: PathBuf,
    },
    /// Formats a file and prints the buffer edits as JSON.
    Edits {
        /// File backing the document.
        path: PathBuf,
    },
    /// Runs the format-on-save hook for a file.
    PreSave {
        /// File about to be saved.
        path: PathBuf,
    },
}
