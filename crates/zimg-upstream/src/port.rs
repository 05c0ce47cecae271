//! Port trait implementation for `UpstreamClient`.
//!
//! Converts internal [`UpstreamError`]s to core results: submission errors
//! for creates, transient statuses for queries.

use async_trait::async_trait;
use tracing::debug;
use zimg_core::{
    SessionIdentity, SubmissionError, SubmittedTask, Task, TaskId, TaskParams, TaskStatus,
    UpstreamTaskPort,
};

use crate::client::UpstreamClient;
use crate::error::UpstreamError;
use crate::http::HttpBackend;

/// Convert internal `UpstreamError` to core `SubmissionError`.
fn map_submission_error(err: UpstreamError) -> SubmissionError {
    match err {
        UpstreamError::Refused { message } => SubmissionError::Rejected { message },
        UpstreamError::ApiRequestFailed { status, .. } => SubmissionError::HttpStatus { status },
        UpstreamError::Network(e) => SubmissionError::Transport(e.to_string()),
        UpstreamError::InvalidHeader { .. } | UpstreamError::InvalidUrl(_) => {
            SubmissionError::Transport(err.to_string())
        }
        UpstreamError::InvalidResponse { message } => SubmissionError::InvalidResponse(message),
        UpstreamError::JsonParse(e) => SubmissionError::InvalidResponse(e.to_string()),
    }
}

#[async_trait]
impl<B: HttpBackend> UpstreamTaskPort for UpstreamClient<B> {
    async fn submit(
        &self,
        prompt: &str,
        params: &TaskParams,
    ) -> Result<SubmittedTask, SubmissionError> {
        let task = Task::new(prompt, params.clone());
        let identity = self.forge_identity();

        self.create_task(&task, &identity)
            .await
            .map_err(map_submission_error)?;

        debug!(task_id = %task.id, "Upstream accepted task");
        Ok(SubmittedTask {
            task_id: task.id,
            identity,
        })
    }

    async fn query(&self, task_id: &TaskId, identity: &SessionIdentity) -> TaskStatus {
        self.query_task(task_id, identity)
            .await
            .unwrap_or_else(|err| TaskStatus::transient(err.to_string()))
    }
}
