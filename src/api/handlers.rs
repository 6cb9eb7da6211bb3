//! Profile evaluation handlers.
//!
//! Every POST body is a [`ProfileRequest`]: optional parameter overrides
//! layered over the configured defaults, plus optional model and domain
//! overrides. Overrides that fail validation are rejected with 400 before
//! any model runs.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::envelope::{self, ApiError, EvaluationMeta};
use crate::config::defaults::MAX_HTTP_SAMPLES;
use crate::config::validation::validate_parameters;
use crate::config::ProfileConfig;
use crate::physics_engine::{HoleCleaningModelKind, ProfileModel};
use crate::types::{DrillingParameters, ParameterOverrides};

/// Shared, read-only state for all handlers.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<ProfileConfig>,
}

impl ApiState {
    pub fn new(config: ProfileConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Body accepted by every evaluation endpoint. All fields optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileRequest {
    pub parameters: ParameterOverrides,
    pub model: Option<HoleCleaningModelKind>,
    pub samples: Option<usize>,
    pub depth_end: Option<f64>,
}

/// A computed profile plus any range warnings raised by the inputs.
#[derive(Debug, Serialize)]
pub struct ProfileResponse<T: Serialize> {
    #[serde(flatten)]
    pub profile: T,
    pub warnings: Vec<String>,
}

/// Resolved inputs for one evaluation.
struct Evaluation {
    model: ProfileModel,
    params: DrillingParameters,
    warnings: Vec<String>,
}

impl Evaluation {
    fn respond<T: Serialize>(self, profile: T) -> Response {
        let meta = EvaluationMeta::new(&self.model, &self.params);
        envelope::evaluated(
            ProfileResponse {
                profile,
                warnings: self.warnings,
            },
            meta,
        )
    }
}

fn prepare(
    state: &ApiState,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Evaluation, ApiError> {
    let Json(request) = body?;

    let params = request.parameters.apply(state.config.parameters);
    let (errors, warnings) = validate_parameters(&params);
    if !errors.is_empty() {
        debug!(errors = ?errors, "Rejected parameter overrides");
        return Err(ApiError::BadRequest(errors.join("; ")));
    }

    if let Some(samples) = request.samples {
        if samples > MAX_HTTP_SAMPLES {
            return Err(ApiError::BadRequest(format!(
                "samples = {samples} exceeds the HTTP maximum of {MAX_HTTP_SAMPLES}"
            )));
        }
    }
    if let Some(end) = request.depth_end {
        if !end.is_finite() || end < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "depth_end = {end} must be a finite, non-negative depth"
            )));
        }
    }

    let mut model = ProfileModel::from_config(&state.config);
    if let Some(kind) = request.model {
        model = model.with_model(kind);
    }
    if let Some(samples) = request.samples {
        model = model.with_samples(samples);
    }
    if request.depth_end.is_some() {
        model = model.with_depth_end(request.depth_end);
    }

    Ok(Evaluation {
        model,
        params,
        warnings: warnings.iter().map(ToString::to_string).collect(),
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health() -> Response {
    envelope::ok(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/v2/config
pub async fn get_config(State(state): State<ApiState>) -> Response {
    envelope::ok(state.config.as_ref())
}

/// POST /api/v2/hole-cleaning
pub async fn hole_cleaning(
    State(state): State<ApiState>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let eval = prepare(&state, body)?;
    let profile = eval.model.hole_cleaning(&eval.params);
    Ok(eval.respond(profile))
}

/// POST /api/v2/bottom-hole-pressure
pub async fn bottom_hole_pressure(
    State(state): State<ApiState>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let eval = prepare(&state, body)?;
    let profile = eval.model.pressure_profile(&eval.params);
    Ok(eval.respond(profile))
}

/// POST /api/v2/effective-wob
pub async fn effective_wob(
    State(state): State<ApiState>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let eval = prepare(&state, body)?;
    let profile = eval.model.effective_wob(&eval.params);
    Ok(eval.respond(profile))
}

/// POST /api/v2/evaluate
pub async fn evaluate(
    State(state): State<ApiState>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let eval = prepare(&state, body)?;
    let result = eval.model.evaluate(&eval.params);
    info!(
        model = %eval.model.hole_cleaning,
        samples = eval.model.samples,
        hole_cleaning = %result.hole_cleaning.recommendation.severity,
        effective_wob = %result.wob.recommendation.severity,
        "Profile evaluated"
    );
    Ok(eval.respond(result))
}
