//! `/health`: liveness check for load balancers.

use axum::Json;
use axum::response::IntoResponse;

/// Health check endpoint.
pub async fn check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}
