//! Shared helpers for gateway integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use zimg_core::PollSettings;
use zimg_core::testing::ScriptedUpstream;
use zimg_gateway::{GatewayConfig, GatewayContext, create_router};

pub const API_KEY: &str = "sk-test";

/// Fast cadence so tests finish in milliseconds.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);
pub const POLL_TIMEOUT: Duration = Duration::from_millis(200);

pub fn test_config() -> GatewayConfig {
    GatewayConfig::new(API_KEY)
        .with_poll_interval(POLL_INTERVAL)
        .with_poll_timeout(POLL_TIMEOUT)
        .with_chat_polling(PollSettings::new(POLL_INTERVAL, POLL_TIMEOUT))
}

pub fn router(upstream: &Arc<ScriptedUpstream>) -> Router {
    create_router(GatewayContext::new(test_config(), upstream.clone()))
}

pub fn post_json(uri: &str, body: &serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn authed(uri: &str, body: &serde_json::Value) -> Request<Body> {
    post_json(uri, body, Some(API_KEY))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Split an SSE body into its `data:` payloads.
pub fn sse_data(body: &str) -> Vec<String> {
    body.split("\n\n")
        .filter_map(|event| {
            event
                .lines()
                .find_map(|line| line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")))
                .map(ToString::to_string)
        })
        .collect()
}

/// Parsed chunks of a chat stream, and whether it ended with `[DONE]`.
pub fn chat_chunks(body: &str) -> (Vec<serde_json::Value>, bool) {
    let data = sse_data(body);
    let done = data.last().is_some_and(|last| last == "[DONE]");
    let chunks = data
        .iter()
        .filter(|d| d.as_str() != "[DONE]")
        .map(|d| serde_json::from_str(d).unwrap())
        .collect();
    (chunks, done)
}

pub fn delta_content(chunk: &serde_json::Value) -> &str {
    chunk["choices"][0]["delta"]["content"].as_str().unwrap_or_default()
}
