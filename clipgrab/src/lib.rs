//! clipgrab library crate.
//!
//! Downloads a video with an external acquisition tool, optionally trims it
//! with an external editing tool, and serves the result over HTTP.

pub mod api;
pub mod config;
pub mod domain;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod storage;
pub mod trimmer;
pub mod utils;

pub use error::{Error, Result};
