//! Argument vector construction for the external formatter.
//!
//! The formatter parses named flags, so the fixed order below only matters
//! for readable log lines. Targets are appended verbatim: the vector is
//! handed to the process as-is and never joined into a shell string.

use std::ffi::OsString;
use std::path::Path;

use jbfmt_config::Config;

use crate::executable::{Platform, resolve_settings};

/// Flag enabling the formatter's built-in code style defaults.
pub const ALLOW_DEFAULTS_FLAG: &str = "-allowDefaults";
/// Flag enabling recursive directory traversal.
pub const RECURSIVE_FLAG: &str = "-r";
/// Option carrying the file mask.
pub const MASK_OPTION: &str = "-m";
/// Option carrying the code style settings file.
pub const SETTINGS_OPTION: &str = "-s";
/// Option carrying the character set.
pub const CHARSET_OPTION: &str = "-charset";

/// Builds `[-allowDefaults] [-r] [-m mask] [-s settings] [-charset cs] targets…`.
///
/// The settings path is resolved for `platform` with
/// [`resolve_settings`].
#[must_use]
pub fn build_arguments<P: AsRef<Path>>(
    config: &Config,
    platform: Platform,
    targets: &[P],
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if config.allow_defaults {
        args.push(ALLOW_DEFAULTS_FLAG.into());
    }
    if config.recursive {
        args.push(RECURSIVE_FLAG.into());
    }
    if !config.mask.is_empty() {
        args.push(MASK_OPTION.into());
        args.push(config.mask.as_str().into());
    }
    if let Some(settings) = resolve_settings(&config.settings, platform) {
        args.push(SETTINGS_OPTION.into());
        args.push(settings.into_os_string());
    }
    if !config.charset.is_empty() {
        args.push(CHARSET_OPTION.into());
        args.push(config.charset.as_str().into());
    }
    args.extend(targets.iter().map(|target| target.as_ref().as_os_str().to_owned()));
    args
}

/// Renders the program and its arguments for log output only.
#[must_use]
pub fn display_command_line(program: &Path, args: &[OsString]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
