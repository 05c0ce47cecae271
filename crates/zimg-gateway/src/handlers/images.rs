//! `/v1/images/generations`.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::info;

use super::parse_json;
use crate::delivery::{BlockingImages, DeliveryAdapter, Handoff};
use crate::error::HttpError;
use crate::models::ImageGenerationRequest;
use crate::state::AppState;

/// Generate an image, either waiting for it or handing off a token.
pub async fn generate(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ImageGenerationRequest = match parse_json(&body) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };
    let Some(prompt) = request.prompt.clone().filter(|p| !p.trim().is_empty()) else {
        return HttpError::BadRequest("prompt is required".to_string()).into_response();
    };

    let params = request.params();
    info!(
        model = request.model.as_deref().unwrap_or_else(|| state.config.default_model()),
        client_poll = request.client_poll,
        seed = ?params.seed,
        "Processing image generation request"
    );

    let adapter: Box<dyn DeliveryAdapter> = if request.client_poll {
        Box::new(Handoff::new(state))
    } else {
        Box::new(BlockingImages::new(state))
    };
    adapter.generate(prompt, params).await
}
