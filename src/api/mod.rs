//! REST API module using Axum
//!
//! JSON endpoints over [`ProfileModel`](crate::physics_engine::ProfileModel):
//! - `GET /health`
//! - `GET /api/v2/config` - the active configuration
//! - `POST /api/v2/{hole-cleaning,bottom-hole-pressure,effective-wob,evaluate}`
//!
//! Surveys are not uploaded over HTTP; load them with the CLI.

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::{ApiState, ProfileRequest};

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::http::{header, Method, Uri};
use axum::{BoxError, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::defaults::{MAX_REQUEST_BODY_BYTES, REQUEST_TIMEOUT_SECS};
use envelope::ApiError;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `WELLPROFILE_CORS_ORIGINS` to a comma-separated list of allowed
/// origins for a separately served front end.
fn build_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    match std::env::var("WELLPROFILE_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            base.allow_origin(allowed)
        }
        Err(_) => base,
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout(format!("Request exceeded {REQUEST_TIMEOUT_SECS}s timeout"))
    } else {
        ApiError::Internal(format!("Unhandled middleware error: {err}"))
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    Router::new()
        .nest("/api/v2", routes::api_routes(state))
        .merge(routes::health_routes())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
