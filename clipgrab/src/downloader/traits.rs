//! Acquisition trait and related types.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::Result;

/// Output template placeholder understood by the acquisition tool.
const TITLE_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Audio transcoding requested from the acquisition tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioExtraction {
    /// Target codec, also the resulting file extension (e.g. "mp3").
    pub codec: String,
    /// Target bitrate in kbit/s.
    pub bitrate_kbps: u32,
}

/// Configuration for a single fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Page or media URL to fetch.
    pub url: String,
    /// Format selector (e.g. "bestvideo[height<=720]+bestaudio/best[height<=720]").
    pub format_selector: String,
    /// Output path template, named after the media title.
    pub output_template: PathBuf,
    /// Container to merge separate audio/video streams into.
    pub merge_format: Option<String>,
    /// Extract and transcode the audio track instead of keeping video.
    pub extract_audio: Option<AudioExtraction>,
}

impl FetchRequest {
    /// Create a fetch writing into `output_dir` under the media title.
    pub fn new(
        url: impl Into<String>,
        format_selector: impl Into<String>,
        output_dir: &Path,
    ) -> Self {
        Self {
            url: url.into(),
            format_selector: format_selector.into(),
            output_template: output_dir.join(TITLE_TEMPLATE),
            merge_format: None,
            extract_audio: None,
        }
    }

    /// Set the merge container.
    pub fn with_merge_format(mut self, format: impl Into<String>) -> Self {
        self.merge_format = Some(format.into());
        self
    }

    /// Request audio extraction.
    pub fn with_audio_extraction(mut self, codec: impl Into<String>, bitrate_kbps: u32) -> Self {
        self.extract_audio = Some(AudioExtraction {
            codec: codec.into(),
            bitrate_kbps,
        });
        self
    }

    /// Directory the output lands in.
    pub fn output_dir(&self) -> &Path {
        self.output_template.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Something that can turn a URL into a local media file.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the media and return the path of the produced file.
    ///
    /// Failures are reported as `Error::Acquisition`, or
    /// `Error::MissingOutput` when the tool succeeded without naming a file.
    async fn fetch(&self, request: &FetchRequest) -> Result<PathBuf>;

    /// Check if the backend is usable (e.g. binary exists).
    fn is_available(&self) -> bool;

    /// Backend version string, if known.
    fn version(&self) -> Option<String>;
}
