//! Process configuration.
//!
//! Everything is read from environment variables once at startup. A `.env`
//! file, if present, is loaded by `main` before this runs.

use std::path::PathBuf;

use tracing::warn;

use crate::api::server::ApiServerConfig;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ApiServerConfig,
    /// Where downloads and trimmed copies are written.
    pub output_dir: PathBuf,
    /// Path to the yt-dlp binary.
    pub ytdlp_path: String,
    /// Path to the ffmpeg binary.
    pub ffmpeg_path: String,
    /// Optional directory for rotated log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ApiServerConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            ytdlp_path: "yt-dlp".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// Supported env vars:
    /// - `PORT` (e.g. "8000")
    /// - `BIND_ADDRESS` (e.g. "0.0.0.0")
    /// - `OUTPUT_DIR` (e.g. "downloads")
    /// - `YTDLP_PATH`, `FFMPEG_PATH`
    /// - `LOG_DIR`
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env_or_default`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = non_empty("PORT") {
            match port.trim().parse::<u16>() {
                Ok(parsed) => config.server.port = parsed,
                Err(_) => warn!(value = %port, "Ignoring invalid PORT"),
            }
        }

        if let Some(bind_address) = non_empty("BIND_ADDRESS") {
            config.server.bind_address = bind_address;
        }

        if let Some(dir) = non_empty("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        if let Some(path) = non_empty("YTDLP_PATH") {
            config.ytdlp_path = path;
        }

        if let Some(path) = non_empty("FFMPEG_PATH") {
            config.ffmpeg_path = path;
        }

        config.log_dir = non_empty("LOG_DIR").map(PathBuf::from);

        config
    }
}
