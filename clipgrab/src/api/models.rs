//! API request and response models.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::domain::{self, DownloadRequest, Quality};

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub output_dir_exists: bool,
    pub output_dir_writable: bool,
}

/// Form body of `POST /download`.
///
/// Fields arrive as raw strings so that blank values can be treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub url: String,
    pub quality: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DownloadForm {
    /// Validate the form and build a domain request.
    ///
    /// The URL is checked before anything else.
    pub fn into_request(self) -> Result<DownloadRequest> {
        domain::validate_url(&self.url)?;

        let quality = self
            .quality
            .as_deref()
            .map(Quality::parse_or_default)
            .unwrap_or_default();
        let start = domain::parse_optional_seconds("start", self.start.as_deref())?;
        let end = domain::parse_optional_seconds("end", self.end.as_deref())?;

        DownloadRequest::new(self.url, quality, start, end)
    }
}

/// Form body of `POST /info`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoForm {
    #[serde(default)]
    pub url: String,
}

/// Response of `POST /info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub url: String,
    pub message: String,
}

/// Query parameters of `GET /cleanup`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CleanupQuery {
    /// Only remove files at least this many seconds old.
    pub older_than_secs: Option<u64>,
}

/// Response of `GET /cleanup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub message: String,
    pub files_removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeRange;

    fn form(url: &str, quality: Option<&str>, start: Option<&str>, end: Option<&str>) -> DownloadForm {
        DownloadForm {
            url: url.to_string(),
            quality: quality.map(str::to_string),
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_to_720p_without_range() {
        let request = form("https://x.test/v", None, None, None)
            .into_request()
            .unwrap();
        assert_eq!(request.quality, Quality::P720);
        assert!(request.range.is_none());
    }

    #[test]
    fn test_blank_bounds_are_absent() {
        let request = form("https://x.test/v", Some("1080p"), Some(""), Some("  "))
            .into_request()
            .unwrap();
        assert_eq!(request.quality, Quality::P1080);
        assert!(request.range.is_none());
    }

    #[test]
    fn test_full_range() {
        let request = form("https://x.test/v", None, Some("1.5"), Some("10"))
            .into_request()
            .unwrap();
        assert_eq!(request.range, Some(TimeRange::new(1.5, 10.0)));
    }

    #[test]
    fn test_url_checked_before_times() {
        let err = form("ftp://x.test/v", None, Some("abc"), None)
            .into_request()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL provided");

        let err = form("https://x.test/v", None, Some("abc"), None)
            .into_request()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid start time");
    }
}
