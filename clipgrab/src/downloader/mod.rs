//! Media acquisition.
//!
//! This module defines the `MediaFetcher` trait and the yt-dlp backed
//! implementation used in production.

mod traits;
mod ytdlp;

pub use traits::{AudioExtraction, FetchRequest, MediaFetcher};
pub use ytdlp::YtDlpFetcher;
