//! HTTP error type and its mapping onto OpenAI-style error bodies.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use zimg_core::GenerationError;

use crate::models::ErrorResponse;

/// Gateway error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Missing or wrong bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed or incomplete request body.
    #[error("{0}")]
    BadRequest(String),

    /// Malformed status query (missing fields or undecodable token).
    #[error("{0}")]
    BadQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    /// HTTP status, error type and stable code for this error.
    pub fn classify(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "invalid_request_error",
                "unauthorized",
            ),
            Self::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "invalid_request",
            ),
            Self::BadQuery(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "query_error",
            ),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "invalid_request_error", "not_found"),
            Self::Generation(err) => match err {
                GenerationError::Submission(_) => {
                    (StatusCode::BAD_GATEWAY, "upstream_error", "submission_failed")
                }
                GenerationError::Failed(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "generation_failed",
                ),
                GenerationError::Timeout(_) => {
                    (StatusCode::GATEWAY_TIMEOUT, "server_error", "timeout")
                }
                GenerationError::Cancelled => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "server_error", "cancelled")
                }
            },
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                "internal_error",
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error_type, code) = self.classify();
        let body = ErrorResponse::new(self.to_string(), error_type, code);

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
