//! Upstream task client.
//!
//! Speaks the two actions of the upstream endpoint: `create` registers a
//! task under a caller-chosen id, `query` reports its status. Both calls
//! must carry the same forged identity.

use std::fmt;

use rand::Rng;
use tracing::{debug, warn};
use url::Url;
use zimg_core::{IdentityForge, SessionIdentity, Task, TaskId, TaskStatus};

use crate::config::UpstreamClientConfig;
use crate::error::{UpstreamError, UpstreamResult};
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{CreateReply, CreateTaskEnvelope, QueryReply, QueryTasksEnvelope, TaskData};
use crate::parsing::project_status;

/// Upper bound (exclusive) of seeds picked on the caller's behalf.
const RANDOM_SEED_BOUND: u64 = 1_000_000;

/// Default upstream client using the reqwest HTTP backend.
pub type DefaultUpstreamClient = UpstreamClient<ReqwestBackend>;

/// Client for the upstream create/query endpoint.
///
/// Generic over the HTTP backend so tests can inject a fake. Use
/// [`DefaultUpstreamClient`] in production code.
pub struct UpstreamClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) endpoint: Url,
    pub(crate) task_type: String,
    pub(crate) forge: IdentityForge,
}

impl<B: HttpBackend> fmt::Debug for UpstreamClient<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("task_type", &self.task_type)
            .finish_non_exhaustive()
    }
}

impl DefaultUpstreamClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the endpoint is not a valid URL or the HTTP client cannot be
    /// built.
    pub fn new(config: &UpstreamClientConfig) -> UpstreamResult<Self> {
        let backend = ReqwestBackend::new(config.timeout)?;
        Self::with_backend(config, backend)
    }
}

impl<B: HttpBackend> UpstreamClient<B> {
    /// Create a client on top of an arbitrary backend.
    pub(crate) fn with_backend(config: &UpstreamClientConfig, backend: B) -> UpstreamResult<Self> {
        Ok(Self {
            backend,
            endpoint: Url::parse(&config.base_url)?,
            task_type: config.task_type.clone(),
            forge: IdentityForge::new(config.profile.clone()),
        })
    }

    /// Forge a fresh identity for a new task.
    pub(crate) fn forge_identity(&self) -> SessionIdentity {
        self.forge.create()
    }

    /// Register `task` upstream under `identity`.
    pub(crate) async fn create_task(
        &self,
        task: &Task,
        identity: &SessionIdentity,
    ) -> UpstreamResult<()> {
        let params = &task.params;
        let seed = params
            .seed
            .unwrap_or_else(|| rand::rng().random_range(0..RANDOM_SEED_BOUND));

        let envelope = CreateTaskEnvelope {
            action: "create",
            task_id: task.id.as_str(),
            task_type: &self.task_type,
            task_data: TaskData {
                prompt: &task.prompt,
                size: &params.size,
                seed,
                steps: params.steps,
                randomized: params.randomized(),
            },
            status: 0,
        };

        debug!(task_id = %task.id, size = %params.size, steps = params.steps, seed, "Creating upstream task");
        let reply: CreateReply = self
            .backend
            .post_json(&self.endpoint, &identity.request_headers(), &envelope)
            .await?;

        if reply.success {
            Ok(())
        } else {
            let message = reply.message.unwrap_or_else(|| "no reason given".to_string());
            warn!(task_id = %task.id, message = %message, "Upstream refused task");
            Err(UpstreamError::Refused { message })
        }
    }

    /// Ask for the current status of `task_id`.
    pub(crate) async fn query_task(
        &self,
        task_id: &TaskId,
        identity: &SessionIdentity,
    ) -> UpstreamResult<TaskStatus> {
        let envelope = QueryTasksEnvelope {
            action: "query",
            task_ids: [task_id.as_str()],
        };
        let reply: QueryReply = self
            .backend
            .post_json(&self.endpoint, &identity.request_headers(), &envelope)
            .await?;
        project_status(reply)
    }
}
