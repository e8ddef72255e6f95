//! Built-in defaults shared by the configuration loader and `Default`.

use crate::logging::LogFormat;

/// Default file mask handed to the formatter.
pub const DEFAULT_MASK: &str = "*";

/// Default character set for `-charset` and for decoding formatted files.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Owned default file mask.
#[must_use]
pub fn default_mask() -> String {
    DEFAULT_MASK.to_owned()
}

/// Owned default character set.
#[must_use]
pub fn default_charset() -> String {
    DEFAULT_CHARSET.to_owned()
}
