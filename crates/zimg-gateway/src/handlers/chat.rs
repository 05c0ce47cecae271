//! `/v1/chat/completions`: image generation dressed as a chat reply.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::info;
use zimg_core::TaskParams;

use super::parse_json;
use crate::delivery::{BlockingChat, DeliveryAdapter, StreamingChat};
use crate::error::HttpError;
use crate::models::ChatCompletionRequest;
use crate::state::AppState;

/// Generate an image from the last message, streaming by default.
pub async fn completions(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ChatCompletionRequest = match parse_json(&body) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };
    let Some(prompt) = request.prompt() else {
        return HttpError::BadRequest("No prompt found in messages".to_string()).into_response();
    };

    let model = request
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.config.default_model().to_string());
    let streaming = request.wants_stream();
    info!(model = %model, streaming, "Processing chat completion request");

    let adapter: Box<dyn DeliveryAdapter> = if streaming {
        Box::new(StreamingChat::new(state, model))
    } else {
        Box::new(BlockingChat::new(state, model))
    };
    adapter.generate(prompt, TaskParams::default()).await
}
