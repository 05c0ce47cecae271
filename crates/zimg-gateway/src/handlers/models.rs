//! Static model listing.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use tracing::debug;

use crate::models::ModelsResponse;
use crate::state::AppState;

/// List the configured models in OpenAI format.
pub async fn list(State(state): State<AppState>) -> Json<ModelsResponse> {
    debug!("GET /v1/models");
    Json(ModelsResponse::from_names(
        state.config.models(),
        Utc::now().timestamp(),
    ))
}
