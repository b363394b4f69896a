//! Output file naming and `Content-Disposition` formatting.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Prefix given to trimmed copies of downloaded files.
pub const TRIMMED_PREFIX: &str = "trimmed_";

/// Path of the trimmed copy of `source`, placed directly inside `dir`.
pub fn trimmed_path(dir: &Path, source: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::trimming(format!("source has no usable file name: {}", source.display()))
        })?;
    Ok(dir.join(format!("{TRIMMED_PREFIX}{name}")))
}

/// Last path component as a string, for headers and log lines.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string())
}

/// Build an `attachment` disposition for `file_name`.
///
/// Titles routinely contain non-ASCII text and quotes, so the plain
/// `filename` parameter carries an ASCII fallback and `filename*` carries the
/// exact UTF-8 name.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == file_name {
        format!("attachment; filename=\"{file_name}\"")
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(file_name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_path_uses_basename() {
        let path = trimmed_path(Path::new("downloads"), Path::new("downloads/My Video.mp4")).unwrap();
        assert_eq!(path, Path::new("downloads").join("trimmed_My Video.mp4"));
    }

    #[test]
    fn test_trimmed_path_without_name() {
        assert!(trimmed_path(Path::new("downloads"), Path::new("/")).is_err());
    }

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("My Video.mp4"),
            "attachment; filename=\"My Video.mp4\""
        );
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = content_disposition("观看 \"clip\".mp4");
        assert!(value.starts_with("attachment; filename=\"__ _clip_.mp4\""));
        assert!(value.contains("filename*=UTF-8''"));
        assert!(value.is_ascii());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("downloads/a.mp3")), "a.mp3");
    }
}
