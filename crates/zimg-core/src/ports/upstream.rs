//! Upstream task port.
//!
//! This port defines the create/query protocol the gateway drives. The
//! production implementation lives in `zimg-upstream`; tests use
//! [`ScriptedUpstream`](crate::testing::ScriptedUpstream).

use std::fmt;

use async_trait::async_trait;

use crate::domain::{SessionIdentity, SubmittedTask, TaskId, TaskParams, TaskStatus};
use crate::error::SubmissionError;

/// Submit generation tasks and query their status.
#[async_trait]
pub trait UpstreamTaskPort: Send + Sync + fmt::Debug {
    /// Create one upstream task under a freshly forged identity.
    ///
    /// The returned identity must be used for every later [`query`] of the
    /// same task.
    ///
    /// [`query`]: UpstreamTaskPort::query
    async fn submit(
        &self,
        prompt: &str,
        params: &TaskParams,
    ) -> Result<SubmittedTask, SubmissionError>;

    /// Query a task once.
    ///
    /// Never fails: transport problems and malformed answers come back as
    /// [`TaskStatus::TransientError`].
    async fn query(&self, task_id: &TaskId, identity: &SessionIdentity) -> TaskStatus;
}
