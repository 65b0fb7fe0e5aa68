//! API error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vitalstream_core::PersistenceError;

/// Errors returned by API handlers, mapped to HTTP status codes and a
/// JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("resource not found: {resource_type} {id}")]
    NotFound { resource_type: &'static str, id: String },

    /// Invalid request data (400)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Storage backend not configured (503)
    #[error("persistence backend not configured")]
    ServiceUnavailable,

    /// Internal failure (500)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Not-found error for a subject id.
    pub fn subject_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { resource_type: "Subject", id: id.into() }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotConfigured => Self::ServiceUnavailable,
            PersistenceError::Fetch(_) | PersistenceError::Write(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Internal(_) => tracing::error!(error = %self, "API error"),
            _ => tracing::warn!(error = %self, "API error"),
        }
        let body = ErrorResponse { code: self.error_code(), message: self.to_string() };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
