//! Application-wide error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
///
/// Each request-level failure maps onto exactly one variant so that the HTTP
/// layer can pick a status code without inspecting messages.
#[derive(Error, Debug)]
pub enum Error {
    /// The client sent something we refuse to act on.
    #[error("{0}")]
    InvalidInput(String),

    /// The acquisition tool could not fetch the media.
    #[error("Failed to download video: {0}")]
    Acquisition(String),

    /// The trimming tool could not produce the requested sub-range.
    #[error("Trimming failed: {0}")]
    Trimming(String),

    /// Acquisition reported success but left no file behind.
    #[error("Output file missing: {0}")]
    MissingOutput(String),

    #[error("IO error while {op} '{}': {source}", path.display())]
    IoPath {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    pub fn trimming(msg: impl Into<String>) -> Self {
        Self::Trimming(msg.into())
    }

    pub fn missing_output(msg: impl Into<String>) -> Self {
        Self::MissingOutput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Wrap an IO error with the operation and path it happened on.
    pub fn io_path(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::IoPath {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether repeating the same request could succeed.
    ///
    /// External tools fail for transient reasons (network, rate limits); bad
    /// input and missing output do not change on retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Acquisition(_) | Self::Trimming(_))
    }

    /// Stable name of the variant, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Acquisition(_) => "acquisition",
            Self::Trimming(_) => "trimming",
            Self::MissingOutput(_) => "missing_output",
            Self::IoPath { .. } | Self::Io(_) => "io",
            Self::Configuration(_) => "configuration",
            Self::Other(_) => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquisition_message_is_wrapped() {
        let err = Error::acquisition("Unsupported URL: https://example.com");
        assert_eq!(
            err.to_string(),
            "Failed to download video: Unsupported URL: https://example.com"
        );
    }

    #[test]
    fn test_io_path_includes_context() {
        let err = Error::io_path(
            "removing file",
            Path::new("/tmp/x.mp4"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("removing file"));
        assert!(msg.contains("/tmp/x.mp4"));
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::acquisition("network").is_recoverable());
        assert!(Error::trimming("corrupt").is_recoverable());
        assert!(!Error::invalid_input("bad url").is_recoverable());
        assert!(!Error::missing_output("gone").is_recoverable());
    }
}
