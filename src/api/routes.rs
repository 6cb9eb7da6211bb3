//! Route table.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Routes mounted under `/api/v2`.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/config", get(handlers::get_config))
        // Models
        .route("/hole-cleaning", post(handlers::hole_cleaning))
        .route("/bottom-hole-pressure", post(handlers::bottom_hole_pressure))
        .route("/effective-wob", post(handlers::effective_wob))
        .route("/evaluate", post(handlers::evaluate))
        .with_state(state)
}

/// Unversioned routes.
pub fn health_routes() -> Router {
    Router::new().route("/health", get(handlers::health))
}
