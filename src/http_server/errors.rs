//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::Logger;
use crate::repo::RepoError;
use crate::validation::ValidationError;

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Client-facing errors with their HTTP status mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Structural input failure, rejected before the repository.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Requested entity key does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Creation would duplicate an existing identity.
    #[error("{0}")]
    Conflict(String),

    /// Foreign key does not resolve to an existing country.
    #[error("country code '{0}' does not exist")]
    UnknownCountry(String),

    /// Anything the client cannot act on, storage failures included.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Structural failures carry field-level detail.
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // Duplicate identity maps to 400, matching the original surface.
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            // A dangling country reference reads as "that country is not
            // there": 404, distinct from a validation failure.
            ApiError::UnknownCountry(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => ApiError::NotFound(msg),
            RepoError::Conflict(msg) => ApiError::Conflict(msg),
            RepoError::UnprocessableReference(code) => ApiError::UnknownCountry(code),
            RepoError::Storage(e) => {
                // A constraint violation reaching the store means a repo
                // pre-check is missing; either way the client sees a
                // generic failure.
                Logger::error("STORAGE_FAILURE", &[("error", &e.to_string())]);
                ApiError::Internal
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
