//! Download and info routes.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tower_http::services::ServeFile;
use tracing::{info, warn};

use crate::Error;
use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{DownloadForm, InfoForm, InfoResponse};
use crate::api::server::AppState;
use crate::orchestrator::TrimStatus;
use crate::utils::{filename, fs};

/// Create the downloads router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/download", post(download))
        .route("/info", post(info_placeholder))
}

/// Download (and optionally trim) a video, then stream it back.
async fn download(
    State(state): State<AppState>,
    Form(form): Form<DownloadForm>,
) -> ApiResult<Response> {
    let request = form.into_request()?;

    info!(
        url = %request.url,
        quality = %request.quality,
        start = ?request.range.map(|r| r.start),
        end = ?request.range.map(|r| r.end),
        "Download requested"
    );

    let outcome = state.orchestrator.produce(&request).await?;

    match &outcome.trim {
        TrimStatus::Failed(reason) => {
            warn!(path = %outcome.path.display(), reason = %reason, "Serving untrimmed file")
        }
        status => info!(path = %outcome.path.display(), trim = %status, "Download finished"),
    }

    if !fs::is_regular_file(&outcome.path).await {
        return Err(Error::missing_output(outcome.path.display().to_string()).into());
    }

    let file_name = filename::display_name(&outcome.path);
    let disposition = HeaderValue::from_str(&filename::content_disposition(&file_name))
        .map_err(|e| ApiError::internal(format!("Invalid header value: {e}")))?;

    let req = axum::http::Request::builder()
        .body(axum::body::Body::empty())
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let mut response = match ServeFile::new(&outcome.path).try_call(req).await {
        Ok(response) => response.into_response(),
        Err(e) => return Err(ApiError::internal(format!("Failed to serve file: {e}"))),
    };

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(request.quality.content_type()),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Disposition"),
    );

    Ok(response)
}

/// Metadata lookup is not implemented; echo the URL back.
async fn info_placeholder(Form(form): Form<InfoForm>) -> Json<InfoResponse> {
    Json(InfoResponse {
        url: form.url,
        message: "Video info endpoint - implement as needed".to_string(),
    })
}
