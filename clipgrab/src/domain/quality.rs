//! Quality tiers and their format selectors.

use std::fmt;

/// Extension of files produced by audio-only downloads.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Bitrate used when transcoding audio-only downloads.
pub const AUDIO_BITRATE_KBPS: u32 = 192;

/// Container that video downloads are merged into.
pub const VIDEO_CONTAINER: &str = "mp4";

/// Requested output quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    /// Up to 720p video.
    #[default]
    P720,
    /// Up to 1080p video.
    P1080,
    /// Up to 2160p video.
    Uhd4k,
    /// Audio track only, transcoded to MP3.
    Audio,
}

impl Quality {
    /// Parse a client-supplied quality string.
    ///
    /// Unknown values fall back to the 720p tier instead of failing.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "1080p" => Self::P1080,
            "4k" => Self::Uhd4k,
            "audio" => Self::Audio,
            _ => Self::P720,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P720 => "720p",
            Self::P1080 => "1080p",
            Self::Uhd4k => "4k",
            Self::Audio => "audio",
        }
    }

    /// Format selector handed to the acquisition tool.
    pub fn format_selector(&self) -> &'static str {
        match self {
            Self::Audio => "bestaudio/best",
            Self::Uhd4k => "bestvideo[height<=2160]+bestaudio/best[height<=2160]",
            Self::P1080 => "bestvideo[height<=1080]+bestaudio/best[height<=1080]",
            Self::P720 => "bestvideo[height<=720]+bestaudio/best[height<=720]",
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Audio)
    }

    /// MIME type of the file served for this quality.
    pub fn content_type(&self) -> &'static str {
        if self.is_audio() {
            "audio/mpeg"
        } else {
            "video/mp4"
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
