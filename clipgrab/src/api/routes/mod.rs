//! API route modules.

pub mod cleanup;
pub mod downloads;
pub mod health;

use axum::Router;

use crate::api::server::AppState;

/// Create the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(downloads::router())
        .merge(cleanup::router())
        .with_state(state)
}
