//! Output directory maintenance.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{CleanupQuery, CleanupResponse};
use crate::api::server::AppState;

/// Create the cleanup router.
pub fn router() -> Router<AppState> {
    Router::new().route("/cleanup", get(cleanup))
}

/// Delete files in the output directory.
///
/// Races with in-flight downloads are possible; callers should schedule this
/// when the service is idle.
async fn cleanup(
    State(state): State<AppState>,
    Query(query): Query<CleanupQuery>,
) -> ApiResult<Json<CleanupResponse>> {
    let older_than = query.older_than_secs.map(Duration::from_secs);

    let files_removed = state
        .orchestrator
        .output_dir()
        .cleanup(older_than)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Cleanup failed");
            ApiError::internal(e.to_string())
        })?;

    Ok(Json(CleanupResponse {
        message: format!("Cleaned up {files_removed} files"),
        files_removed,
    }))
}
