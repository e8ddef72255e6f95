//! Resolution and preparation of the external formatter executable.
//!
//! Users configure a bare base name such as `/opt/idea/bin/format` once;
//! [`resolve_executable`] appends `.bat` on Windows and `.sh` elsewhere so
//! the same setting works on every platform. The code style settings path
//! goes through the same normalisation in [`resolve_settings`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::FormatError;

/// Host platform family used to pick the formatter script suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows: the formatter ships as `format.bat`.
    Windows,
    /// Every other platform: the formatter ships as `format.sh`.
    Unix,
}

impl Platform {
    /// Returns the platform this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    /// Script extension appended to suffix-less formatter paths.
    #[must_use]
    pub const fn script_extension(self) -> &'static str {
        match self {
            Self::Windows => "bat",
            Self::Unix => "sh",
        }
    }
}

/// Trims the configured path and appends the platform script suffix when
/// the path has no extension.
///
/// # Errors
///
/// Returns [`FormatError::NotConfigured`] when the trimmed path is empty.
pub fn resolve_executable(configured: &str, platform: Platform) -> Result<PathBuf, FormatError> {
    let trimmed = configured.trim();
    if trimmed.is_empty() {
        return Err(FormatError::NotConfigured);
    }

    Ok(with_platform_suffix(trimmed, platform))
}

/// Normalises the code style settings path the same way as the executable.
///
/// Returns `None` when the trimmed path is empty, meaning no `-s` option is
/// passed to the formatter.
#[must_use]
pub fn resolve_settings(configured: &str, platform: Platform) -> Option<PathBuf> {
    let trimmed = configured.trim();
    (!trimmed.is_empty()).then(|| with_platform_suffix(trimmed, platform))
}

fn with_platform_suffix(trimmed: &str, platform: Platform) -> PathBuf {
    let path = PathBuf::from(trimmed);
    if path.extension().is_some() {
        return path;
    }

    let mut with_suffix = path.into_os_string();
    with_suffix.push(".");
    with_suffix.push(platform.script_extension());
    PathBuf::from(with_suffix)
}

/// Checks that the resolved executable exists without touching it.
///
/// # Errors
///
/// Returns [`FormatError::ExecutableNotFound`] when the path is absent or
/// its existence cannot be determined.
pub fn ensure_exists(path: &Path) -> Result<(), FormatError> {
    match path.try_exists() {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(FormatError::ExecutableNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Marks the formatter script as executable (`0o755`).
///
/// The launch attempt that follows is the authoritative signal, so callers
/// treat a failure here as a warning.
///
/// # Errors
///
/// Returns the I/O error reported while reading or updating permissions.
#[cfg(unix)]
pub fn mark_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

/// Marks the formatter script as executable.
///
/// Windows has no executable bit; the check only confirms the file is
/// reachable.
///
/// # Errors
///
/// Returns the I/O error reported while reading metadata.
#[cfg(not(unix))]
pub fn mark_executable(path: &Path) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}
