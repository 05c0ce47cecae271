//! Bearer-token guard for the generation endpoints.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::HttpError;

/// Full `Authorization` value accepted for `api_key`.
pub(crate) fn expected_header(api_key: &str) -> Arc<str> {
    Arc::from(format!("Bearer {api_key}"))
}

/// Auth middleware: validate the bearer token.
///
/// `expected` holds the full `"Bearer <key>"` string, so the check is a
/// single comparison. Runs before the handler, so a rejected request never
/// reaches the upstream.
pub(crate) async fn validate_bearer(expected: Arc<str>, req: Request, next: Next) -> Response {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth {
        Some(h) if h == expected.as_ref() => next.run(req).await,
        _ => {
            warn!(
                path = %req.uri().path(),
                "Unauthorized request - missing or invalid token"
            );
            HttpError::Unauthorized.into_response()
        }
    }
}
