//! Media trimming.
//!
//! Cuts a time range out of an already downloaded file. The production
//! implementation shells out to ffmpeg and re-encodes the range.

mod ffmpeg;
mod traits;

pub use ffmpeg::FfmpegTrimmer;
pub use traits::{AudioCodec, MediaTrimmer, TrimRequest, VideoCodec};
