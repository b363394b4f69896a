//! yt-dlp acquisition backend.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::traits::{FetchRequest, MediaFetcher};
use crate::utils::process::run_command;
use crate::{Error, Result};

/// Acquisition backed by the `yt-dlp` executable.
///
/// The final file path (after merging and post-processing) is read from
/// yt-dlp's `--print after_move:filepath` output.
pub struct YtDlpFetcher {
    /// Path to the yt-dlp binary.
    binary_path: String,
    /// Cached version string.
    version: Option<String>,
}

impl YtDlpFetcher {
    pub fn new(binary_path: impl Into<String>) -> Self {
        let binary_path = binary_path.into();
        let version = process_utils::probe_version(&binary_path, "--version");
        Self {
            binary_path,
            version,
        }
    }

    /// Build yt-dlp command arguments.
    fn build_args(request: &FetchRequest) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "--no-warnings".to_string(),
            "--quiet".to_string(),
            "-f".to_string(),
            request.format_selector.clone(),
            "-o".to_string(),
            request.output_template.to_string_lossy().into_owned(),
        ];

        if let Some(ref format) = request.merge_format {
            args.extend(["--merge-output-format".to_string(), format.clone()]);
        }

        if let Some(ref audio) = request.extract_audio {
            args.extend([
                "-x".to_string(),
                "--audio-format".to_string(),
                audio.codec.clone(),
                "--audio-quality".to_string(),
                format!("{}K", audio.bitrate_kbps),
            ]);
        }

        // Printing at the after_move stage does not imply --simulate.
        args.extend(["--print".to_string(), "after_move:filepath".to_string()]);

        // "--" keeps URLs starting with '-' from being read as options.
        args.extend(["--".to_string(), request.url.clone()]);

        args
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<PathBuf> {
        let args = Self::build_args(request);
        debug!(args = ?args, "Running yt-dlp");

        let mut command = process_utils::tokio_command(&self.binary_path);
        command.args(&args).env("PYTHONIOENCODING", "utf-8");

        let output = run_command(&mut command)
            .await
            .map_err(|e| Error::acquisition(format!("failed to run yt-dlp: {e}")))?;

        if !output.success() {
            let reason = output.error_summary();
            warn!(url = %request.url, reason = %reason, "yt-dlp failed");
            return Err(Error::acquisition(reason));
        }

        let path = output
            .last_stdout_line()
            .map(PathBuf::from)
            .ok_or_else(|| Error::missing_output("yt-dlp did not report an output file"))?;

        info!(
            url = %request.url,
            path = %path.display(),
            elapsed_secs = output.duration,
            "yt-dlp finished"
        );
        Ok(path)
    }

    fn is_available(&self) -> bool {
        self.version.is_some()
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn position(args: &[String], flag: &str) -> usize {
        args.iter()
            .position(|a| a == flag)
            .unwrap_or_else(|| panic!("missing {flag} in {args:?}"))
    }

    #[test]
    fn test_video_args() {
        let request = FetchRequest::new(
            "https://www.youtube.com/watch?v=abc",
            "bestvideo[height<=720]+bestaudio/best[height<=720]",
            Path::new("downloads"),
        )
        .with_merge_format("mp4");

        let args = YtDlpFetcher::build_args(&request);

        assert!(args.contains(&"--no-playlist".to_string()));
        let f = position(&args, "-f");
        assert_eq!(args[f + 1], request.format_selector);
        let o = position(&args, "-o");
        assert!(args[o + 1].ends_with("%(title)s.%(ext)s"));
        let m = position(&args, "--merge-output-format");
        assert_eq!(args[m + 1], "mp4");
        assert!(!args.contains(&"-x".to_string()));
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=abc");
        assert_eq!(args[args.len() - 2], "--");
    }

    #[test]
    fn test_audio_args() {
        let request = FetchRequest::new("https://x.test/v", "bestaudio/best", Path::new("out"))
            .with_audio_extraction("mp3", 192);

        let args = YtDlpFetcher::build_args(&request);

        assert!(args.contains(&"-x".to_string()));
        let a = position(&args, "--audio-format");
        assert_eq!(args[a + 1], "mp3");
        let q = position(&args, "--audio-quality");
        assert_eq!(args[q + 1], "192K");
        let p = position(&args, "--print");
        assert_eq!(args[p + 1], "after_move:filepath");
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let fetcher = YtDlpFetcher::new("definitely-not-a-real-binary-7f3a");
        assert!(!fetcher.is_available());
        assert_eq!(fetcher.name(), "yt-dlp");
    }

    #[tokio::test]
    async fn test_fetch_with_missing_binary_is_acquisition_error() {
        let fetcher = YtDlpFetcher::new("definitely-not-a-real-binary-7f3a");
        let request = FetchRequest::new("https://x.test/v", "best", Path::new("out"));

        let err = fetcher.fetch(&request).await.unwrap_err();
        assert!(matches!(err, Error::Acquisition(_)));
    }
}
