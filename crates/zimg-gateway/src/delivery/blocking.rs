//! Synchronous delivery: the request stays open until the image exists.

use async_trait::async_trait;
use axum::Json;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use zimg_core::{PollSettings, TaskParams};

use super::{DeliveryAdapter, completion_id, image_markdown, submit};
use crate::error::HttpError;
use crate::models::{
    AssistantMessage, ChatChoice, ChatCompletionResponse, ImageData, ImagesResponse,
};
use crate::state::{AppState, GatewayContext};

/// Submit and poll inline, returning the image URL.
///
/// Dropping the returned future (client disconnect) stops polling.
async fn wait_for_image(
    ctx: &GatewayContext,
    prompt: &str,
    params: &TaskParams,
    settings: PollSettings,
    mode: &'static str,
) -> Result<String, HttpError> {
    let task = submit(ctx, prompt, params, mode).await?;
    let url = ctx
        .poller(settings)
        .poll_until(&task.task_id, &task.identity, &CancellationToken::new())
        .await?;
    Ok(url)
}

/// `/v1/images/generations` without `client_poll`.
#[derive(Debug, Clone)]
pub struct BlockingImages {
    state: AppState,
}

impl BlockingImages {
    pub const fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl DeliveryAdapter for BlockingImages {
    async fn generate(&self, prompt: String, params: TaskParams) -> Response {
        let settings = self.state.config.image_polling;
        match wait_for_image(&self.state, &prompt, &params, settings, "blocking").await {
            Ok(url) => Json(ImagesResponse {
                created: Utc::now().timestamp(),
                data: vec![ImageData { url }],
            })
            .into_response(),
            Err(e) => e.into_response(),
        }
    }
}

/// `/v1/chat/completions` with `stream: false`.
#[derive(Debug, Clone)]
pub struct BlockingChat {
    state: AppState,
    model: String,
}

impl BlockingChat {
    pub const fn new(state: AppState, model: String) -> Self {
        Self { state, model }
    }
}

#[async_trait]
impl DeliveryAdapter for BlockingChat {
    async fn generate(&self, prompt: String, params: TaskParams) -> Response {
        let id = completion_id();
        let created = Utc::now().timestamp();
        let settings = self.state.config.chat_polling;

        match wait_for_image(&self.state, &prompt, &params, settings, "chat").await {
            Ok(url) => Json(ChatCompletionResponse {
                id,
                object: "chat.completion".to_string(),
                created,
                model: self.model.clone(),
                choices: vec![ChatChoice {
                    index: 0,
                    message: AssistantMessage {
                        role: "assistant".to_string(),
                        content: format!("{}\n\n**Prompt:** {prompt}", image_markdown(&url)),
                    },
                    finish_reason: Some("stop".to_string()),
                }],
            })
            .into_response(),
            Err(e) => e.into_response(),
        }
    }
}
