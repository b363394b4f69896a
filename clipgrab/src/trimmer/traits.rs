//! Trimming trait and related types.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::Result;
use crate::domain::TimeRange;

/// Video codec for the trimmed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoCodec {
    /// H.264/AVC, the broadly playable delivery codec.
    #[default]
    H264,
    /// Copy the video stream without re-encoding (cuts snap to keyframes).
    Copy,
}

impl VideoCodec {
    pub(crate) fn as_ffmpeg_args(&self) -> [&'static str; 2] {
        match self {
            Self::H264 => ["-c:v", "libx264"],
            Self::Copy => ["-c:v", "copy"],
        }
    }
}

/// Audio codec for the trimmed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioCodec {
    /// AAC codec.
    #[default]
    Aac,
    /// Copy the audio stream without re-encoding.
    Copy,
}

impl AudioCodec {
    pub(crate) fn as_ffmpeg_args(&self) -> [&'static str; 2] {
        match self {
            Self::Aac => ["-c:a", "aac"],
            Self::Copy => ["-c:a", "copy"],
        }
    }
}

/// A single trim job.
#[derive(Debug, Clone)]
pub struct TrimRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub range: TimeRange,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
}

impl TrimRequest {
    /// Create a trim job using the default delivery codecs.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, range: TimeRange) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            range,
            video_codec: VideoCodec::default(),
            audio_codec: AudioCodec::default(),
        }
    }

    pub fn with_codecs(mut self, video: VideoCodec, audio: AudioCodec) -> Self {
        self.video_codec = video;
        self.audio_codec = audio;
        self
    }
}

/// Something that can cut a time range out of a media file.
#[async_trait]
pub trait MediaTrimmer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Write `request.range` of `request.input` to `request.output`.
    ///
    /// Fails with `Error::Trimming` on unreadable input or an invalid range.
    /// On failure no partial output is left behind.
    async fn trim(&self, request: &TrimRequest) -> Result<()>;

    /// Check if the backend is usable (e.g. binary exists).
    fn is_available(&self) -> bool;

    /// Backend version string, if known.
    fn version(&self) -> Option<String>;
}
