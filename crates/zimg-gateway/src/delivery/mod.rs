//! Delivery adapters: how a task's eventual result reaches the client.
//!
//! Every adapter submits exactly one upstream task and then differs only in
//! how it waits:
//!
//! - [`BlockingImages`] / [`BlockingChat`] poll inline and answer once,
//! - [`Handoff`] answers immediately with a resumable token,
//! - [`StreamingChat`] answers with an SSE stream fed by a background task.

mod blocking;
mod handoff;
mod streaming;

use async_trait::async_trait;
use axum::response::Response;
use chrono::Utc;
use tracing::{debug, error};
use zimg_core::{GenerationError, SubmittedTask, TaskParams};

pub use blocking::{BlockingChat, BlockingImages};
pub use handoff::Handoff;
pub use streaming::StreamingChat;

use crate::error::HttpError;
use crate::state::GatewayContext;

/// Turns one generation request into one HTTP response.
#[async_trait]
pub trait DeliveryAdapter: Send + Sync {
    /// Submit a task for `prompt` and shape its result.
    ///
    /// Submission failures become JSON errors; no partial response is ever
    /// started before the upstream accepted the task.
    async fn generate(&self, prompt: String, params: TaskParams) -> Response;
}

/// Submit once, logging the outcome under the adapter's `mode`.
pub(crate) async fn submit(
    ctx: &GatewayContext,
    prompt: &str,
    params: &TaskParams,
    mode: &'static str,
) -> Result<SubmittedTask, HttpError> {
    match ctx.upstream.submit(prompt, params).await {
        Ok(task) => {
            debug!(task_id = %task.task_id, mode, size = %params.size, steps = params.steps, "Task submitted");
            Ok(task)
        }
        Err(e) => {
            error!(mode, error = %e, "Task submission failed");
            Err(GenerationError::from(e).into())
        }
    }
}

/// Markdown embedding of a generated image.
pub(crate) fn image_markdown(url: &str) -> String {
    format!("![Generated Image]({url})")
}

/// Completion id in the `chatcmpl-<millis>` form.
pub(crate) fn completion_id() -> String {
    format!("chatcmpl-{}", Utc::now().timestamp_millis())
}
