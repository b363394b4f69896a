//! Liveness and health routes.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::models::{HealthResponse, RootResponse};
use crate::api::server::AppState;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

/// Service banner.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "healthy".to_string(),
        message: "Video Downloader API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Report whether the output directory is usable.
///
/// Always 200; a broken directory shows up in the body only.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let dir = state.orchestrator.output_dir().health().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        output_dir_exists: dir.exists,
        output_dir_writable: dir.writable,
    })
}
