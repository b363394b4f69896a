//! REST API server.
//!
//! Exposes download, health and maintenance endpoints over axum.

pub mod error;
pub mod models;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerConfig, AppState};
