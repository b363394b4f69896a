//! Request-level domain types.

mod quality;
mod request;

pub use quality::{AUDIO_BITRATE_KBPS, AUDIO_EXTENSION, Quality, VIDEO_CONTAINER};
pub use request::{DownloadRequest, TimeRange, parse_optional_seconds, validate_url};
