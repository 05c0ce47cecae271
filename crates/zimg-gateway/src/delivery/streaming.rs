//! Streaming delivery: chat-completion chunks over SSE.
//!
//! The handler returns as soon as the upstream accepted the task. A
//! background task registered with the gateway's tracker polls and feeds a
//! bounded channel; the response body drains it. Success, failure and
//! timeout all end with the terminal marker chunk and `[DONE]`; a client
//! that went away just stops the poll. Dropping the only sender closes the
//! stream.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use zimg_core::{GenerationError, ResultPoller, SubmittedTask, TaskParams};

use super::{DeliveryAdapter, completion_id, image_markdown, submit};
use crate::models::{ChatChunkChoice, ChatCompletionChunk, ChatDelta};
use crate::state::AppState;

/// Content of the heartbeat chunk sent while waiting.
pub const HEARTBEAT: &str = "·";

/// Sentinel closing an OpenAI-style stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// `/v1/chat/completions` with streaming (the default).
#[derive(Debug, Clone)]
pub struct StreamingChat {
    state: AppState,
    model: String,
}

impl StreamingChat {
    pub const fn new(state: AppState, model: String) -> Self {
        Self { state, model }
    }
}

#[async_trait]
impl DeliveryAdapter for StreamingChat {
    async fn generate(&self, prompt: String, params: TaskParams) -> Response {
        let task = match submit(&self.state, &prompt, &params, "stream").await {
            Ok(task) => task,
            Err(e) => return e.into_response(),
        };

        let (tx, rx) = mpsc::channel(self.state.config.stream_buffer);
        let sink = ChunkSink {
            tx,
            chunks: ChunkFactory {
                id: completion_id(),
                created: Utc::now().timestamp(),
                model: self.model.clone(),
            },
        };
        let poller = self.state.poller(self.state.config.stream_polling);
        self.state
            .tracker
            .spawn(stream_task(poller, task, prompt, sink));

        let stream = ReceiverStream::new(rx).map(Ok::<Event, Infallible>);
        Sse::new(stream).into_response()
    }
}

/// Background half of a streaming request.
async fn stream_task(poller: ResultPoller, task: SubmittedTask, prompt: String, sink: ChunkSink) {
    let task_id = task.task_id.clone();
    let opening = ChatDelta {
        role: Some("assistant".to_string()),
        content: Some(format!("🎨 Generating image with Z-Image...\n\n> {prompt}\n\n")),
    };
    if !sink.send(opening, None).await {
        debug!(task_id = %task_id, "Client gone before first chunk");
        return;
    }

    let cancel = CancellationToken::new();
    let outcome = tokio::select! {
        result = poller.poll_until_observed(&task.task_id, &task.identity, &cancel, |attempt, _| {
            if attempt % 2 == 0 && sink.heartbeat() == Delivery::Closed {
                cancel.cancel();
            }
        }) => result,
        () = sink.closed() => Err(GenerationError::Cancelled),
    };

    let content = match outcome {
        Ok(url) => format!("\n\n{}", image_markdown(&url)),
        Err(GenerationError::Cancelled) => {
            debug!(task_id = %task_id, "Client disconnected, polling stopped");
            return;
        }
        Err(e) => {
            warn!(task_id = %task_id, error = %e, "Streaming generation failed");
            format!("\n\n❌ **Error**: {e}")
        }
    };

    let delivered = sink.send(ChatDelta::text(content), None).await
        && sink.send(ChatDelta::text(String::new()), Some("stop")).await
        && sink.done().await;
    debug!(task_id = %task_id, delivered, "Stream finished");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Sent,
    Skipped,
    Closed,
}

/// Builds chunks sharing one completion id.
struct ChunkFactory {
    id: String,
    created: i64,
    model: String,
}

impl ChunkFactory {
    fn event(&self, delta: ChatDelta, finish_reason: Option<&str>) -> Option<Event> {
        let chunk = ChatCompletionChunk {
            id: self.id.clone(),
            object: "chat.completion.chunk".to_string(),
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChatChunkChoice {
                index: 0,
                delta,
                finish_reason: finish_reason.map(ToString::to_string),
            }],
        };
        match serde_json::to_string(&chunk) {
            Ok(json) => Some(Event::default().data(json)),
            Err(e) => {
                warn!(error = %e, "Failed to serialize chunk");
                None
            }
        }
    }
}

/// Sending half of one stream. Dropping it closes the response body.
struct ChunkSink {
    tx: mpsc::Sender<Event>,
    chunks: ChunkFactory,
}

impl ChunkSink {
    /// Returns false once the client is gone.
    async fn send(&self, delta: ChatDelta, finish_reason: Option<&str>) -> bool {
        match self.chunks.event(delta, finish_reason) {
            Some(event) => self.tx.send(event).await.is_ok(),
            None => true,
        }
    }

    /// Best effort: a full buffer drops the heartbeat.
    fn heartbeat(&self) -> Delivery {
        let Some(event) = self
            .chunks
            .event(ChatDelta::text(HEARTBEAT), None)
        else {
            return Delivery::Skipped;
        };
        match self.tx.try_send(event) {
            Ok(()) => Delivery::Sent,
            Err(TrySendError::Full(_)) => Delivery::Skipped,
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    async fn done(&self) -> bool {
        self.tx
            .send(Event::default().data(DONE_SENTINEL))
            .await
            .is_ok()
    }

    async fn closed(&self) {
        self.tx.closed().await;
    }
}
