//! Client-handoff delivery: return a resumable token instead of waiting.
//!
//! The token is the task's [`AuthContext`]; the client polls
//! `/v1/query/status` with it. Holding the token is enough to replay the
//! upstream session.

use async_trait::async_trait;
use axum::Json;
use axum::response::{IntoResponse, Response};
use zimg_core::{AuthContext, TaskParams};

use super::{DeliveryAdapter, submit};
use crate::error::HttpError;
use crate::models::HandoffResponse;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct Handoff {
    state: AppState,
}

impl Handoff {
    pub const fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn hand_off(&self, prompt: &str, params: &TaskParams) -> Result<HandoffResponse, HttpError> {
        let task = submit(&self.state, prompt, params, "handoff").await?;
        let auth_context = AuthContext::encode(&task.identity)
            .map_err(|e| HttpError::Internal(format!("cannot encode auth_context: {e}")))?;

        Ok(HandoffResponse {
            status: "submitted".to_string(),
            task_id: task.task_id,
            auth_context,
        })
    }
}

#[async_trait]
impl DeliveryAdapter for Handoff {
    async fn generate(&self, prompt: String, params: TaskParams) -> Response {
        match self.hand_off(&prompt, &params).await {
            Ok(body) => Json(body).into_response(),
            Err(e) => e.into_response(),
        }
    }
}
