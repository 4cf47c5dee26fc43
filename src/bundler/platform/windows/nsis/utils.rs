//! NSIS utility functions.
//!
//! Helper functions for string escaping, version formatting, compression
//! settings, and file operations.

use crate::bundler::{
    error::{ErrorExt, Result},
    settings::NsisCompression,
};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Escape a value for use inside a double-quoted NSIS string.
///
/// `$` starts a variable, `$\"` is the quote escape, and line breaks are
/// written as `$\r$\n` so multi-line descriptions stay on one script line.
pub fn nsis_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => escaped.push_str("$$"),
            '"' => escaped.push_str("$\\\""),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("$\\r$\\n");
            }
            '\n' => escaped.push_str("$\\r$\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a relative path for `File`, `Delete` and `RMDir` arguments.
///
/// Windows file names cannot contain quotes or line breaks, so only `$`
/// needs escaping.
pub fn escape_path(path: &str) -> String {
    path.replace('$', "$$")
}

/// Map compression setting to NSIS compression string.
pub fn map_compression(compression: NsisCompression) -> &'static str {
    match compression {
        NsisCompression::None => "none",
        NsisCompression::Zlib => "zlib",
        NsisCompression::Bzip2 => "bzip2",
        NsisCompression::Lzma => "lzma",
    }
}

/// Format version string for NSIS VIProductVersion.
///
/// NSIS requires exactly 4 numeric parts (major.minor.patch.build).
/// Each part keeps its leading digits, so pre-release and post-release
/// tags are dropped:
/// - "1" -> "1.0.0.0"
/// - "1.2" -> "1.2.0.0"
/// - "1.2rc1" -> "1.2.0.0"
/// - "1.2.3.4.5" -> "1.2.3.4" (truncates to first 4)
/// - "20241019.1" -> "0.1.0.0" (parts above 65535 become 0)
pub fn format_version_for_nsis(version: &str) -> String {
    let mut parts: Vec<String> = version
        .split('.')
        .take(4)
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            match digits.parse::<u16>() {
                Ok(value) => value.to_string(),
                Err(_) => {
                    if !digits.is_empty() {
                        log::warn!("Version part {digits} exceeds 65535, using 0 in VIProductVersion");
                    }
                    "0".to_string()
                }
            }
        })
        .collect();
    parts.resize(4, "0".to_string());
    parts.join(".")
}

/// Write file with UTF-8 BOM (required by NSIS).
///
/// NSIS only treats a script as UTF-8 when it starts with the byte order
/// mark (EF BB BF).
pub async fn write_utf8_bom(path: &Path, content: &str) -> Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .fs_context("creating NSI script file", path)?;

    file.write_all(&[0xEF, 0xBB, 0xBF])
        .await
        .fs_context("writing UTF-8 BOM", path)?;
    file.write_all(content.as_bytes())
        .await
        .fs_context("writing NSI content", path)?;
    file.flush().await.fs_context("flushing NSI file", path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nsis_escape() {
        assert_eq!(nsis_escape("plain"), "plain");
        assert_eq!(nsis_escape("cost $5"), "cost $$5");
        assert_eq!(nsis_escape(r#"say "hi""#), r#"say $\"hi$\""#);
        assert_eq!(nsis_escape("a\nb\r\nc"), r"a$\r$\nb$\r$\nc");
    }

    #[test]
    fn test_format_version_for_nsis() {
        assert_eq!(format_version_for_nsis("1"), "1.0.0.0");
        assert_eq!(format_version_for_nsis("1.0"), "1.0.0.0");
        assert_eq!(format_version_for_nsis("2.1b3"), "2.1.0.0");
        assert_eq!(format_version_for_nsis("1.2.3.4.5"), "1.2.3.4");
        assert_eq!(format_version_for_nsis("dev"), "0.0.0.0");
    }

    #[test]
    fn test_format_version_for_nsis_keeps_parts_in_word_range() {
        assert_eq!(format_version_for_nsis("20241019.1"), "0.1.0.0");
        assert_eq!(format_version_for_nsis("1.65535.65536"), "1.65535.0.0");
    }

    #[tokio::test]
    async fn test_write_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.nsi");
        write_utf8_bom(&path, "Name x").await.unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(&bytes[3..], b"Name x");
    }
}
