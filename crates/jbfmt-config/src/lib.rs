//! Layered configuration for the `jbfmt` formatter bridge.
//!
//! [`Config`] is loaded through `ortho_config`, which merges built-in
//! defaults, an optional TOML file (`--config-path` or
//! `JBFMT_CONFIG_PATH`), `JBFMT_*` environment variables, and command-line
//! flags, in that order of increasing precedence.
//!
//! The formatter keys mirror the editor extension settings.
//! Their camelCase spellings (`formatShPath`, `allowDefaults`,
//! `formatOnSave`) are accepted in configuration files as aliases.

mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_CHARSET, DEFAULT_LOG_FILTER, DEFAULT_MASK, default_charset, default_log_filter,
    default_log_filter_string, default_log_format, default_mask,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Configuration snapshot consumed by the format orchestrator and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "JBFMT")]
pub struct Config {
    /// Base path of the external formatter. A platform suffix is appended
    /// when the path carries no extension.
    #[serde(alias = "formatShPath")]
    #[ortho_config(default = String::new())]
    pub format_sh_path: String,
    /// Passes `-allowDefaults` to the formatter.
    #[serde(alias = "allowDefaults")]
    #[ortho_config(default = true)]
    pub allow_defaults: bool,
    /// Passes `-r` to the formatter.
    #[ortho_config(default = true)]
    pub recursive: bool,
    /// File mask passed with `-m` when non-empty.
    #[ortho_config(default = default_mask())]
    pub mask: String,
    /// Code style settings file passed with `-s` when non-empty.
    #[ortho_config(default = String::new())]
    pub settings: String,
    /// Character set passed with `-charset` and used to decode the
    /// reformatted file.
    #[ortho_config(default = default_charset())]
    pub charset: String,
    /// Formats documents from the pre-save hook.
    #[serde(alias = "formatOnSave")]
    #[ortho_config(default = false)]
    pub format_on_save: bool,
    /// Upper bound on a single formatter run. Unbounded when unset or zero.
    pub timeout_secs: Option<u64>,
    /// `tracing` filter directive used by the CLI telemetry.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format used by the CLI telemetry.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format_sh_path: String::new(),
            allow_defaults: true,
            recursive: true,
            mask: default_mask(),
            settings: String::new(),
            charset: default_charset(),
            format_on_save: false,
            timeout_secs: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Configured formatter path, untrimmed and unresolved.
    #[must_use]
    pub fn format_sh_path(&self) -> &str {
        self.format_sh_path.as_str()
    }

    /// Character set label used for `-charset` and for decoding.
    #[must_use]
    pub fn charset(&self) -> &str {
        self.charset.as_str()
    }

    /// Whether the pre-save hook should format documents.
    #[must_use]
    pub const fn format_on_save(&self) -> bool {
        self.format_on_save
    }

    /// Timeout applied to a formatter run, if configured. Zero seconds
    /// means no limit.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Filter directive for the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for the telemetry subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
