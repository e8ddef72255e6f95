//! Re-reads formatted files using the configured character set.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8};

use crate::error::FormatError;

/// Looks up an `encoding_rs` encoding by WHATWG label. An empty label means
/// UTF-8.
///
/// # Errors
///
/// Returns [`FormatError::UnsupportedCharset`] for unknown labels.
pub fn encoding_for(charset: &str) -> Result<&'static Encoding, FormatError> {
    let label = charset.trim();
    if label.is_empty() {
        return Ok(UTF_8);
    }
    Encoding::for_label(label.as_bytes()).ok_or_else(|| FormatError::UnsupportedCharset {
        charset: label.to_owned(),
    })
}

/// Reads `path` and decodes it with `charset`, stripping a leading BOM.
///
/// # Errors
///
/// Returns [`FormatError::UnsupportedCharset`] for unknown labels and
/// [`FormatError::ReadBack`] when the file cannot be read or contains bytes
/// that are invalid in the charset.
pub fn read_with_charset(path: &Path, charset: &str) -> Result<String, FormatError> {
    let encoding = encoding_for(charset)?;
    let bytes = fs::read(path).map_err(|err| FormatError::ReadBack {
        path: path.to_path_buf(),
        message: err.to_string(),
        source: Some(Arc::new(err)),
    })?;

    let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(FormatError::ReadBack {
            path: path.to_path_buf(),
            message: format!("file is not valid {}", encoding.name()),
            source: None,
        });
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn write_bytes(dir: &TempDir, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join("Main.java");
        fs::write(&path, bytes).expect("write fixture");
        path
    }

    #[rstest]
    #[case("utf-8", "UTF-8")]
    #[case("UTF8", "UTF-8")]
    #[case("", "UTF-8")]
    #[case("gbk", "GBK")]
    #[case("iso-8859-1", "windows-1252")]
    #[case("Shift_JIS", "Shift_JIS")]
    fn resolves_labels(#[case] label: &str, #[case] expected: &str) {
        let encoding = encoding_for(label).expect("label resolves");
        assert_eq!(encoding.name(), expected);
    }

    #[test]
    fn unknown_labels_are_rejected() {
        let error = encoding_for("klingon").expect_err("unknown label fails");
        assert!(matches!(
            error,
            FormatError::UnsupportedCharset { ref charset } if charset == "klingon"
        ));
    }

    #[test]
    fn decodes_utf8_and_strips_bom() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_bytes(&dir, "\u{feff}class Main {}\n".as_bytes());
        let text = read_with_charset(&path, "utf-8").expect("file decodes");
        assert_eq!(text, "class Main {}\n");
    }

    #[test]
    fn decodes_gbk() {
        let dir = TempDir::new().expect("temp dir");
        // "// 中文" encoded as GBK.
        let path = write_bytes(&dir, &[0x2f, 0x2f, 0x20, 0xd6, 0xd0, 0xce, 0xc4]);
        let text = read_with_charset(&path, "gbk").expect("file decodes");
        assert_eq!(text, "// 中文");
    }

    #[test]
    fn malformed_bytes_fail_read_back() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_bytes(&dir, &[0x66, 0x6f, 0xff, 0xfe, 0x6f]);
        let error = read_with_charset(&path, "utf-8").expect_err("invalid utf-8 fails");
        match error {
            FormatError::ReadBack { message, source, .. } => {
                assert!(message.contains("UTF-8"), "unexpected message: {message}");
                assert!(source.is_none());
            }
            other => panic!("expected ReadBack, got {other}"),
        }
    }

    #[test]
    fn missing_files_fail_read_back_with_source() {
        let dir = TempDir::new().expect("temp dir");
        let error = read_with_charset(&dir.path().join("absent.java"), "utf-8")
            .expect_err("missing file fails");
        assert!(matches!(
            error,
            FormatError::ReadBack { source: Some(_), .. }
        ));
    }
}
