//! Download job orchestration.
//!
//! Acquisition is mandatory; trimming is best-effort. A failed trim falls back
//! to the untrimmed file and is reported through [`TrimStatus`] rather than
//! failing the job.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{AUDIO_BITRATE_KBPS, AUDIO_EXTENSION, DownloadRequest, TimeRange, VIDEO_CONTAINER};
use crate::downloader::{FetchRequest, MediaFetcher};
use crate::storage::OutputDir;
use crate::trimmer::{MediaTrimmer, TrimRequest};
use crate::utils::{filename, fs};
use crate::{Error, Result};

/// What happened to the trim step of a job.
#[derive(Debug, Clone, PartialEq)]
pub enum TrimStatus {
    /// No complete range was supplied.
    NotRequested,
    /// A range was supplied but the job was audio-only.
    SkippedForAudio,
    /// The served file is the trimmed copy.
    Applied,
    /// Trimming failed; the served file is the untrimmed original.
    Failed(String),
}

impl TrimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRequested => "not_requested",
            Self::SkippedForAudio => "skipped_for_audio",
            Self::Applied => "applied",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl fmt::Display for TrimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed ({reason})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Result of a finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    /// File to hand back to the client.
    pub path: PathBuf,
    pub trim: TrimStatus,
}

/// Runs acquisition and optional trimming against one output directory.
pub struct Orchestrator {
    output_dir: OutputDir,
    fetcher: Arc<dyn MediaFetcher>,
    trimmer: Arc<dyn MediaTrimmer>,
}

impl Orchestrator {
    pub fn new(
        output_dir: OutputDir,
        fetcher: Arc<dyn MediaFetcher>,
        trimmer: Arc<dyn MediaTrimmer>,
    ) -> Self {
        Self {
            output_dir,
            fetcher,
            trimmer,
        }
    }

    pub fn output_dir(&self) -> &OutputDir {
        &self.output_dir
    }

    /// Translate a download request into the acquisition tool's terms.
    fn fetch_request(&self, request: &DownloadRequest) -> FetchRequest {
        let fetch = FetchRequest::new(
            request.url.clone(),
            request.quality.format_selector(),
            self.output_dir.path(),
        );
        if request.quality.is_audio() {
            fetch.with_audio_extraction(AUDIO_EXTENSION, AUDIO_BITRATE_KBPS)
        } else {
            fetch.with_merge_format(VIDEO_CONTAINER)
        }
    }

    /// Acquire the media and trim it if a range was requested.
    pub async fn produce(&self, request: &DownloadRequest) -> Result<JobOutcome> {
        let fetch = self.fetch_request(request);

        let mut acquired = self.fetcher.fetch(&fetch).await.map_err(|e| match e {
            Error::Acquisition(_) | Error::MissingOutput(_) => e,
            other => Error::acquisition(other.to_string()),
        })?;

        if request.quality.is_audio() {
            acquired = acquired.with_extension(AUDIO_EXTENSION);
            let trim = if request.range.is_some() {
                info!(url = %request.url, "Ignoring trim range for audio download");
                TrimStatus::SkippedForAudio
            } else {
                TrimStatus::NotRequested
            };
            return Ok(JobOutcome {
                path: acquired,
                trim,
            });
        }

        let Some(range) = request.trim_range() else {
            return Ok(JobOutcome {
                path: acquired,
                trim: TrimStatus::NotRequested,
            });
        };

        Ok(self.trim_or_fallback(acquired, range).await)
    }

    /// Trim `acquired`; on any failure keep serving the original.
    async fn trim_or_fallback(&self, acquired: PathBuf, range: TimeRange) -> JobOutcome {
        match self.trim(&acquired, range).await {
            Ok(trimmed) => {
                if let Err(e) = fs::remove_file_if_exists(&acquired).await {
                    warn!(error = %e, "Failed to remove untrimmed source");
                }
                JobOutcome {
                    path: trimmed,
                    trim: TrimStatus::Applied,
                }
            }
            Err(e) => {
                warn!(
                    path = %acquired.display(),
                    trimmer = self.trimmer.name(),
                    error = %e,
                    "Trimming failed, serving untrimmed file"
                );
                JobOutcome {
                    path: acquired,
                    trim: TrimStatus::Failed(e.to_string()),
                }
            }
        }
    }

    async fn trim(&self, acquired: &Path, range: TimeRange) -> Result<PathBuf> {
        let output = filename::trimmed_path(self.output_dir.path(), acquired)?;
        let request = TrimRequest::new(acquired, &output, range);
        self.trimmer.trim(&request).await?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quality;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Writes `<title>.<ext>` into the requested directory.
    struct StubFetcher {
        title: &'static str,
        fail_with: Option<&'static str>,
        seen: Mutex<Vec<FetchRequest>>,
    }

    impl StubFetcher {
        fn ok(title: &'static str) -> Self {
            Self {
                title,
                fail_with: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(reason: &'static str) -> Self {
            Self {
                title: "unused",
                fail_with: Some(reason),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MediaFetcher for StubFetcher {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, request: &FetchRequest) -> Result<PathBuf> {
            self.seen.lock().unwrap().push(request.clone());
            if let Some(reason) = self.fail_with {
                return Err(Error::Other(reason.to_string()));
            }
            // Like yt-dlp's prepared filename, audio reports the pre-conversion name.
            let (written, reported) = match request.extract_audio {
                Some(ref audio) => (audio.codec.as_str(), "webm"),
                None => ("mp4", "mp4"),
            };
            let dir = request.output_dir();
            std::fs::write(dir.join(format!("{}.{written}", self.title)), b"media").unwrap();
            Ok(dir.join(format!("{}.{reported}", self.title)))
        }

        fn is_available(&self) -> bool {
            true
        }

        fn version(&self) -> Option<String> {
            None
        }
    }

    struct StubTrimmer {
        succeed: bool,
        calls: AtomicUsize,
    }

    impl StubTrimmer {
        fn new(succeed: bool) -> Self {
            Self {
                succeed,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaTrimmer for StubTrimmer {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn trim(&self, request: &TrimRequest) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.succeed || !request.range.is_cuttable() {
                return Err(Error::trimming("stub refused"));
            }
            std::fs::copy(&request.input, &request.output).unwrap();
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn version(&self) -> Option<String> {
            None
        }
    }

    fn orchestrator(
        temp: &TempDir,
        fetcher: Arc<StubFetcher>,
        trimmer: Arc<StubTrimmer>,
    ) -> Orchestrator {
        Orchestrator::new(OutputDir::new(temp.path()), fetcher, trimmer)
    }

    fn request(quality: Quality, start: Option<f64>, end: Option<f64>) -> DownloadRequest {
        DownloadRequest::new("https://x.test/watch?v=1", quality, start, end).unwrap()
    }

    #[tokio::test]
    async fn test_video_without_range_is_untouched() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::ok("clip"));
        let trimmer = Arc::new(StubTrimmer::new(true));
        let orch = orchestrator(&temp, fetcher.clone(), trimmer.clone());

        let outcome = orch.produce(&request(Quality::P1080, None, None)).await.unwrap();

        assert_eq!(outcome.path, temp.path().join("clip.mp4"));
        assert_eq!(outcome.trim, TrimStatus::NotRequested);
        assert_eq!(trimmer.calls.load(Ordering::SeqCst), 0);

        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(seen[0].format_selector, Quality::P1080.format_selector());
        assert_eq!(seen[0].merge_format.as_deref(), Some("mp4"));
        assert!(seen[0].extract_audio.is_none());
    }

    #[tokio::test]
    async fn test_single_bound_skips_trimming() {
        let temp = TempDir::new().unwrap();
        let trimmer = Arc::new(StubTrimmer::new(true));
        let orch = orchestrator(&temp, Arc::new(StubFetcher::ok("clip")), trimmer.clone());

        for (start, end) in [(Some(3.0), None), (None, Some(8.0))] {
            let outcome = orch.produce(&request(Quality::P720, start, end)).await.unwrap();
            assert_eq!(outcome.path, temp.path().join("clip.mp4"));
            assert_eq!(outcome.trim, TrimStatus::NotRequested);
        }
        assert_eq!(trimmer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_trim_replaces_original() {
        let temp = TempDir::new().unwrap();
        let orch = orchestrator(
            &temp,
            Arc::new(StubFetcher::ok("clip")),
            Arc::new(StubTrimmer::new(true)),
        );

        let outcome = orch
            .produce(&request(Quality::P720, Some(1.0), Some(4.0)))
            .await
            .unwrap();

        assert_eq!(outcome.path, temp.path().join("trimmed_clip.mp4"));
        assert!(outcome.trim.is_applied());
        assert!(outcome.path.exists());
        assert!(!temp.path().join("clip.mp4").exists());
    }

    #[tokio::test]
    async fn test_failed_trim_keeps_original() {
        let temp = TempDir::new().unwrap();
        let orch = orchestrator(
            &temp,
            Arc::new(StubFetcher::ok("clip")),
            Arc::new(StubTrimmer::new(false)),
        );

        let outcome = orch
            .produce(&request(Quality::P720, Some(1.0), Some(4.0)))
            .await
            .unwrap();

        assert_eq!(outcome.path, temp.path().join("clip.mp4"));
        assert!(matches!(outcome.trim, TrimStatus::Failed(_)));
        assert!(outcome.path.exists());
        assert!(!temp.path().join("trimmed_clip.mp4").exists());
    }

    #[tokio::test]
    async fn test_inverted_range_falls_back() {
        let temp = TempDir::new().unwrap();
        let trimmer = Arc::new(StubTrimmer::new(true));
        let orch = orchestrator(&temp, Arc::new(StubFetcher::ok("clip")), trimmer.clone());

        let outcome = orch
            .produce(&request(Quality::P720, Some(9.0), Some(2.0)))
            .await
            .unwrap();

        // The range reaches the trimmer, which is the one to reject it.
        assert_eq!(trimmer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.path, temp.path().join("clip.mp4"));
        assert!(matches!(outcome.trim, TrimStatus::Failed(_)));
    }

    #[tokio::test]
    async fn test_audio_rewrites_extension_and_never_trims() {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::ok("song"));
        let trimmer = Arc::new(StubTrimmer::new(true));
        let orch = orchestrator(&temp, fetcher.clone(), trimmer.clone());

        let outcome = orch
            .produce(&request(Quality::Audio, Some(1.0), Some(4.0)))
            .await
            .unwrap();

        assert_eq!(outcome.path, temp.path().join("song.mp3"));
        assert_eq!(outcome.path.extension().unwrap(), "mp3");
        assert!(outcome.path.exists());
        assert_eq!(outcome.trim, TrimStatus::SkippedForAudio);
        assert_eq!(trimmer.calls.load(Ordering::SeqCst), 0);

        let seen = fetcher.seen.lock().unwrap();
        let audio = seen[0].extract_audio.as_ref().unwrap();
        assert_eq!(audio.codec, "mp3");
        assert_eq!(audio.bitrate_kbps, 192);
        assert_eq!(seen[0].format_selector, "bestaudio/best");
    }

    #[tokio::test]
    async fn test_fetch_errors_become_acquisition_errors() {
        let temp = TempDir::new().unwrap();
        let orch = orchestrator(
            &temp,
            Arc::new(StubFetcher::failing("network unreachable")),
            Arc::new(StubTrimmer::new(true)),
        );

        let err = orch
            .produce(&request(Quality::P720, None, None))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Acquisition(_)));
        assert_eq!(
            err.to_string(),
            "Failed to download video: network unreachable"
        );
    }

    #[test]
    fn test_trim_status_display() {
        assert_eq!(TrimStatus::Applied.to_string(), "applied");
        assert_eq!(
            TrimStatus::Failed("bad input".into()).to_string(),
            "failed (bad input)"
        );
    }
}
