//! Chat completions in streaming and blocking form.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use zimg_core::TaskStatus;
use zimg_core::testing::{ScriptedUpstream, UpstreamCall};
use zimg_gateway::{GatewayContext, create_router};

use common::{authed, body_json, body_text, chat_chunks, delta_content, router, test_config};

fn chat_request(prompt: &str, stream: Option<bool>) -> Value {
    let mut body = json!({
        "model": "z-image-turbo",
        "messages": [
            {"role": "system", "content": "You draw pictures."},
            {"role": "user", "content": prompt}
        ]
    });
    if let Some(stream) = stream {
        body["stream"] = json!(stream);
    }
    body
}

async fn stream_chunks(upstream: &Arc<ScriptedUpstream>, body: &Value) -> (Vec<Value>, bool) {
    let response = router(upstream)
        .oneshot(authed("/v1/chat/completions", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );
    chat_chunks(&body_text(response).await)
}

fn assert_terminal_marker(chunk: &Value) {
    assert_eq!(chunk["choices"][0]["finish_reason"], "stop");
    assert_eq!(delta_content(chunk), "");
}

#[tokio::test]
async fn streams_status_heartbeat_and_image() {
    let upstream = Arc::new(ScriptedUpstream::with_statuses([
        TaskStatus::queued(),
        TaskStatus::succeeded("http://x/fox.png"),
    ]));

    let (chunks, done) = stream_chunks(&upstream, &chat_request("a red fox", None)).await;

    assert!(done);
    assert_eq!(chunks.len(), 4);

    let opening = &chunks[0];
    assert_eq!(opening["object"], "chat.completion.chunk");
    assert_eq!(opening["model"], "z-image-turbo");
    assert_eq!(opening["choices"][0]["delta"]["role"], "assistant");
    assert_eq!(opening["choices"][0]["finish_reason"], Value::Null);
    assert!(delta_content(opening).contains("> a red fox"));

    assert_eq!(delta_content(&chunks[1]), "·");
    assert!(chunks[1]["choices"][0]["delta"].get("role").is_none());
    assert_eq!(
        delta_content(&chunks[2]),
        "\n\n![Generated Image](http://x/fox.png)"
    );
    assert_terminal_marker(&chunks[3]);

    let id = &opening["id"];
    assert!(id.as_str().unwrap().starts_with("chatcmpl-"));
    assert!(chunks.iter().all(|chunk| &chunk["id"] == id));
    assert_eq!(upstream.submit_count(), 1);
    assert_eq!(upstream.query_count(), 2);
}

#[tokio::test]
async fn streamed_failure_ends_cleanly() {
    let upstream = Arc::new(ScriptedUpstream::with_statuses([TaskStatus::failed(
        "upstream reported failure",
    )]));

    let (chunks, done) = stream_chunks(&upstream, &chat_request("a red fox", Some(true))).await;

    assert!(done);
    assert_eq!(chunks.len(), 3);
    let error = delta_content(&chunks[1]);
    assert!(error.starts_with("\n\n❌ **Error**: "), "{error}");
    assert!(error.contains("upstream reported failure"));
    assert_terminal_marker(&chunks[2]);
}

#[tokio::test]
async fn streamed_timeout_ends_cleanly() {
    let upstream = Arc::new(ScriptedUpstream::new());

    let (chunks, done) = stream_chunks(&upstream, &chat_request("a red fox", None)).await;

    assert!(done);
    let last_two = &chunks[chunks.len() - 2..];
    assert!(delta_content(&last_two[0]).contains("Timed out after 200ms"));
    assert_terminal_marker(&last_two[1]);
    assert!(
        chunks[1..chunks.len() - 2]
            .iter()
            .all(|chunk| delta_content(chunk) == "·")
    );
}

#[tokio::test]
async fn streaming_disconnect_stops_polling() {
    let upstream = Arc::new(ScriptedUpstream::new());
    // Long budget so only the disconnect can end the poll loop
    let config = test_config().with_poll_timeout(Duration::from_secs(10));
    let ctx = GatewayContext::new(config, upstream.clone());
    let tracker = ctx.tracker().clone();

    let response = create_router(ctx)
        .oneshot(authed("/v1/chat/completions", &chat_request("a red fox", None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body();
    let first = body.frame().await.unwrap().unwrap().into_data().unwrap();
    assert!(String::from_utf8_lossy(&first).contains("> a red fox"));
    drop(body);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let after_drop = upstream.query_count();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(upstream.query_count(), after_drop);
    assert!(tracker.is_empty());
}

#[tokio::test]
async fn rejected_stream_is_plain_json_error() {
    let upstream = Arc::new(ScriptedUpstream::rejecting("quota exceeded"));

    let response = router(&upstream)
        .oneshot(authed("/v1/chat/completions", &chat_request("fox", None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"]["code"], "submission_failed");
}

#[tokio::test]
async fn blocking_completion_embeds_image_and_prompt() {
    let upstream = Arc::new(ScriptedUpstream::with_statuses([
        TaskStatus::running(),
        TaskStatus::succeeded("http://x/fox.png"),
    ]));

    let response = router(&upstream)
        .oneshot(authed(
            "/v1/chat/completions",
            &chat_request("a red fox", Some(false)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["object"], "chat.completion");
    assert_eq!(body["model"], "z-image-turbo");
    assert_eq!(body["choices"][0]["finish_reason"], "stop");
    assert_eq!(body["choices"][0]["message"]["role"], "assistant");
    assert_eq!(
        body["choices"][0]["message"]["content"],
        "![Generated Image](http://x/fox.png)\n\n**Prompt:** a red fox"
    );
}

#[tokio::test]
async fn blocking_completion_failure_is_json_error() {
    let upstream = Arc::new(ScriptedUpstream::with_statuses([TaskStatus::failed("nope")]));

    let response = router(&upstream)
        .oneshot(authed("/v1/chat/completions", &chat_request("fox", Some(false))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"]["code"], "generation_failed");
}

#[tokio::test]
async fn missing_prompt_is_rejected() {
    let upstream = Arc::new(ScriptedUpstream::new());
    let app = router(&upstream);

    for body in [
        json!({"messages": []}),
        json!({"messages": [{"role": "user", "content": "   "}]}),
        json!({"messages": [{"role": "user"}]}),
    ] {
        let response = app
            .clone()
            .oneshot(authed("/v1/chat/completions", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let error = body_json(response).await;
        assert_eq!(error["error"]["message"], "No prompt found in messages");
    }

    assert_eq!(upstream.submit_count(), 0);
}

#[tokio::test]
async fn content_parts_and_default_model() {
    let upstream = Arc::new(ScriptedUpstream::with_statuses([TaskStatus::succeeded(
        "http://x/cat.png",
    )]));

    let response = router(&upstream)
        .oneshot(authed(
            "/v1/chat/completions",
            &json!({
                "stream": false,
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "a cat"},
                        {"type": "image_url", "image_url": {"url": "http://x/ref.png"}},
                        {"type": "text", "text": "wearing a hat"}
                    ]
                }]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["model"], "z-image-turbo");

    let calls = upstream.calls();
    let UpstreamCall::Submit { prompt, params, .. } = &calls[0] else {
        panic!("first call should be a submit");
    };
    assert_eq!(prompt, "a cat\nwearing a hat");
    assert_eq!(params, &zimg_core::TaskParams::default());
}
