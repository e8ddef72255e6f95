//! Configuration loading helpers for the `jbfmt` CLI.
//!
//! Configuration flags precede the subcommand. The splitter hands those
//! flags to `ortho_config` and leaves the remaining tokens for `clap`.

use std::ffi::{OsStr, OsString};

use jbfmt_config::Config;
use ortho_config::OrthoConfig;

use crate::errors::AppError;

/// Value-taking flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of [`Config`]. Boolean fields
/// are switched off through the `--no-*` CLI flags instead.
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--format-sh-path",
    "--mask",
    "--settings",
    "--charset",
    "--timeout-secs",
    "--log-filter",
    "--log-format",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI.
    ///
    /// `args` holds the program name followed by the configuration flags
    /// that preceded the subcommand.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

/// Loads [`Config`] through `ortho_config`.
pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

fn process_config_flag(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Skip;
    }

    let mut parts = text.splitn(2, '=');
    let Some(flag) = parts.next() else {
        return FlagAction::Skip;
    };
    let has_inline_value = parts.next().is_some();

    if CONFIG_CLI_FLAGS.contains(&flag) {
        return FlagAction::Include {
            needs_value: !has_inline_value,
        };
    }
    FlagAction::Skip
}

/// Configuration arguments and the index where the command tokens begin.
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut command_start = 1usize;
    let mut pending_value = false;

    for argument in rest {
        if pending_value {
            pending_value = false;
        } else {
            match process_config_flag(argument) {
                FlagAction::Include { needs_value } => pending_value = needs_value,
                FlagAction::Skip => break,
            }
        }
        config_arguments.push(argument.clone());
        command_start += 1;
    }

    ConfigArgumentSplit {
        config_arguments,
        command_start,
    }
}

/// Rebuilds the argument list `clap` sees: the program name followed by
/// everything after the configuration flags.
pub(crate) fn command_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.iter().skip(split.command_start))
        .cloned()
        .collect()
}
