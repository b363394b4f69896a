//! ffmpeg trimming backend.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::traits::{MediaTrimmer, TrimRequest};
use crate::utils::fs;
use crate::utils::process::run_command;
use crate::{Error, Result};

/// Trimming backed by the `ffmpeg` executable.
pub struct FfmpegTrimmer {
    /// Path to ffmpeg binary.
    ffmpeg_path: String,
    /// Cached version string.
    version: Option<String>,
}

impl FfmpegTrimmer {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        let ffmpeg_path = ffmpeg_path.into();
        let version = process_utils::probe_version(&ffmpeg_path, "-version");
        Self {
            ffmpeg_path,
            version,
        }
    }

    /// Whether the output container benefits from moving the moov atom up front.
    fn wants_faststart(request: &TrimRequest) -> bool {
        request
            .output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "mp4" | "m4v" | "mov"))
    }

    /// Build FFmpeg command arguments from a trim job.
    fn build_args(request: &TrimRequest) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-hide_banner", "-nostats", "-loglevel", "error"]
            .into_iter()
            .map(String::from)
            .collect();

        // Seek before the input for speed; timestamps restart at zero so the
        // end bound is expressed as a duration.
        args.extend(["-ss".to_string(), format!("{:.3}", request.range.start)]);
        args.extend(["-i".to_string(), request.input.to_string_lossy().into_owned()]);
        args.extend(["-t".to_string(), format!("{:.3}", request.range.duration())]);

        args.extend(request.video_codec.as_ffmpeg_args().map(String::from));
        args.extend(request.audio_codec.as_ffmpeg_args().map(String::from));

        if Self::wants_faststart(request) {
            args.extend(["-movflags".to_string(), "+faststart".to_string()]);
        }

        args.push(request.output.to_string_lossy().into_owned());
        args
    }

    async fn discard_partial_output(request: &TrimRequest) {
        if let Err(e) = fs::remove_file_if_exists(&request.output).await {
            warn!(error = %e, "Failed to remove partial trim output");
        }
    }
}

impl Default for FfmpegTrimmer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl MediaTrimmer for FfmpegTrimmer {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn trim(&self, request: &TrimRequest) -> Result<()> {
        let range = request.range;
        if !range.is_cuttable() {
            return Err(Error::trimming(format!(
                "invalid time range {:.3}..{:.3}",
                range.start, range.end
            )));
        }
        if !fs::is_regular_file(&request.input).await {
            return Err(Error::trimming(format!(
                "input file not found: {}",
                request.input.display()
            )));
        }

        let args = Self::build_args(request);
        debug!(args = ?args, "Running ffmpeg trim");

        let mut command = process_utils::tokio_command(&self.ffmpeg_path);
        command.args(&args).env("LC_ALL", "C");

        let output = match run_command(&mut command).await {
            Ok(output) => output,
            Err(e) => {
                Self::discard_partial_output(request).await;
                return Err(Error::trimming(format!("failed to run ffmpeg: {e}")));
            }
        };

        if !output.success() {
            Self::discard_partial_output(request).await;
            return Err(Error::trimming(output.error_summary()));
        }

        let produced = tokio::fs::metadata(&request.output)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if produced == 0 {
            Self::discard_partial_output(request).await;
            return Err(Error::trimming("ffmpeg produced no output"));
        }

        info!(
            input = %request.input.display(),
            output = %request.output.display(),
            start = range.start,
            end = range.end,
            size_bytes = produced,
            elapsed_secs = output.duration,
            "Trim completed"
        );
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.version.is_some()
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }
}
