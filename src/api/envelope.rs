//! JSON envelope for profile responses.
//!
//! Success bodies are `{ data, meta }`. Evaluation endpoints add an
//! `evaluation` block to `meta` describing the strategy and domain that
//! produced the series, so clients can label axes without re-deriving
//! defaults. Failures are `{ error, meta }`, built from [`ApiError`].

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::physics_engine::ProfileModel;
use crate::types::{DepthUnit, DrillingParameters};

const API_VERSION: &str = "2";

/// Strategy and domain behind an evaluated profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMeta {
    pub model: &'static str,
    pub depth_unit: DepthUnit,
    pub depth_end: f64,
    pub samples: usize,
    pub inclination_deg: [f64; 2],
}

impl EvaluationMeta {
    pub fn new(model: &ProfileModel, params: &DrillingParameters) -> Self {
        let strategy = model.hole_cleaning_model();
        Self {
            model: strategy.name(),
            depth_unit: strategy.depth_unit(),
            depth_end: model.resolved_depth_end(params),
            samples: model.samples,
            inclination_deg: [model.inclination_start_deg, model.inclination_end_deg],
        }
    }
}

#[derive(Debug, Serialize)]
struct Meta {
    timestamp: String,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    evaluation: Option<EvaluationMeta>,
}

impl Meta {
    fn now(evaluation: Option<EvaluationMeta>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: API_VERSION,
            evaluation,
        }
    }
}

#[derive(Serialize)]
struct Success<T> {
    data: T,
    meta: Meta,
}

/// `200 OK` with `data` and a plain `meta` block.
pub fn ok<T: Serialize>(data: T) -> Response {
    Json(Success {
        data,
        meta: Meta::now(None),
    })
    .into_response()
}

/// `200 OK` for a computed profile; `meta.evaluation` describes its domain.
pub fn evaluated<T: Serialize>(data: T, evaluation: EvaluationMeta) -> Response {
    Json(Success {
        data,
        meta: Meta::now(Some(evaluation)),
    })
    .into_response()
}

/// Request failures, rendered as `{ "error": { code, message }, "meta": ... }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Timeout(_) => "REQUEST_TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'static str,
    message: &'a str,
}

#[derive(Serialize)]
struct Failure<'a> {
    error: ErrorDetail<'a>,
    meta: Meta,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let body = Failure {
            error: ErrorDetail {
                code: self.code(),
                message: &message,
            },
            meta: Meta::now(None),
        };
        (self.status(), Json(body)).into_response()
    }
}
