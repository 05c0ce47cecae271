//! HTTP handlers, one module per endpoint group.

pub mod chat;
pub mod health;
pub mod images;
pub mod models;
pub mod status;

use axum::body::Bytes;
use axum::http::Uri;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Parse a JSON body, mapping failures to a 400.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, HttpError> {
    serde_json::from_slice(body).map_err(|e| HttpError::BadRequest(format!("Invalid request body: {e}")))
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> HttpError {
    HttpError::NotFound(uri.path().to_string())
}
