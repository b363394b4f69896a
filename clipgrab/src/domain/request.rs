//! Download request validation.

use crate::domain::Quality;
use crate::{Error, Result};

/// A `[start, end)` range in seconds.
///
/// Bound ordering is not checked here; the trimming tool
/// rejects ranges it cannot cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Build a range only when both bounds are present.
    pub fn from_bounds(start: Option<f64>, end: Option<f64>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self::new(start, end)),
            _ => None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the range can actually be cut out of a file.
    pub fn is_cuttable(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.end > self.start
    }
}

/// A validated download request.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: Quality,
    /// Requested trim range; `None` unless both bounds were supplied.
    pub range: Option<TimeRange>,
}

impl DownloadRequest {
    pub fn new(
        url: impl Into<String>,
        quality: Quality,
        start: Option<f64>,
        end: Option<f64>,
    ) -> Result<Self> {
        let url = url.into();
        validate_url(&url)?;

        if let Some(start) = start
            && start < 0.0
        {
            return Err(Error::invalid_input("Start time must be non-negative"));
        }

        Ok(Self {
            url,
            quality,
            range: TimeRange::from_bounds(start, end),
        })
    }

    /// Range the orchestrator should trim to, if any.
    ///
    /// Audio downloads are never trimmed.
    pub fn trim_range(&self) -> Option<TimeRange> {
        if self.quality.is_audio() {
            None
        } else {
            self.range
        }
    }
}

/// Reject anything that is not an absolute `http`/`https` URL.
pub fn validate_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::invalid_input("Invalid URL provided"))
    }
}

/// Parse an optional seconds value from a form field.
///
/// Missing and blank values are treated as absent.
pub fn parse_optional_seconds(field: &str, value: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => Ok(Some(seconds)),
        _ => Err(Error::invalid_input(format!("Invalid {field} time"))),
    }
}
