//! HTTP boundary for the forecast service.
//!
//! A single `/calculate` endpoint takes `[horizon, series]` and answers with
//! the forecast as a JSON array.

mod request;
mod routes;

pub use request::ForecastRequest;
pub use routes::{calculate, handle_payload, liveness, router, AppState};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::error::ForecastError;

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Malformed payload; rejected before the core runs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Model selection or forecasting failed.
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// The blocking worker running the search did not complete.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ApiError::InvalidRequest(reason.into())
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forecast(ForecastError::NoViableModel { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Forecast(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
