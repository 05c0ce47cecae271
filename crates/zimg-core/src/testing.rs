//! In-memory upstream for tests.
//!
//! [`ScriptedUpstream`] replays a fixed sequence of statuses and records
//! every call, so tests can assert on call counts and on the identity each
//! query carried.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{SessionIdentity, SubmittedTask, TaskId, TaskParams, TaskStatus};
use crate::error::SubmissionError;
use crate::ports::UpstreamTaskPort;
use crate::services::IdentityForge;

/// One recorded interaction with the scripted upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamCall {
    Submit {
        prompt: String,
        params: TaskParams,
        task: SubmittedTask,
    },
    Query {
        task_id: TaskId,
        identity: SessionIdentity,
    },
}

/// Scripted [`UpstreamTaskPort`] implementation.
#[derive(Debug)]
pub struct ScriptedUpstream {
    forge: IdentityForge,
    script: Mutex<VecDeque<TaskStatus>>,
    fallback: TaskStatus,
    rejection: Option<String>,
    calls: Mutex<Vec<UpstreamCall>>,
}

impl Default for ScriptedUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedUpstream {
    /// An upstream that accepts every task and reports it queued forever.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forge: IdentityForge::default(),
            script: Mutex::new(VecDeque::new()),
            fallback: TaskStatus::queued(),
            rejection: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer queries with `statuses` in order, then with the fallback.
    #[must_use]
    pub fn with_statuses(statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        let upstream = Self::new();
        lock(&upstream.script).extend(statuses);
        upstream
    }

    /// Status returned once the script is exhausted (default: queued).
    #[must_use]
    pub fn with_fallback(mut self, status: TaskStatus) -> Self {
        self.fallback = status;
        self
    }

    /// Refuse every submission with `message`.
    #[must_use]
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            rejection: Some(message.into()),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<UpstreamCall> {
        lock(&self.calls).clone()
    }

    #[must_use]
    pub fn submit_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, UpstreamCall::Submit { .. }))
            .count()
    }

    #[must_use]
    pub fn query_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, UpstreamCall::Query { .. }))
            .count()
    }

    /// Identities carried by each query, in call order.
    #[must_use]
    pub fn queried_identities(&self) -> Vec<SessionIdentity> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                UpstreamCall::Query { identity, .. } => Some(identity.clone()),
                UpstreamCall::Submit { .. } => None,
            })
            .collect()
    }

    /// Tasks accepted so far, in call order.
    #[must_use]
    pub fn submitted(&self) -> Vec<SubmittedTask> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                UpstreamCall::Submit { task, .. } => Some(task.clone()),
                UpstreamCall::Query { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl UpstreamTaskPort for ScriptedUpstream {
    async fn submit(
        &self,
        prompt: &str,
        params: &TaskParams,
    ) -> Result<SubmittedTask, SubmissionError> {
        if let Some(message) = &self.rejection {
            return Err(SubmissionError::Rejected {
                message: message.clone(),
            });
        }

        let task = SubmittedTask {
            task_id: TaskId::generate(),
            identity: self.forge.create(),
        };
        lock(&self.calls).push(UpstreamCall::Submit {
            prompt: prompt.to_string(),
            params: params.clone(),
            task: task.clone(),
        });
        Ok(task)
    }

    async fn query(&self, task_id: &TaskId, identity: &SessionIdentity) -> TaskStatus {
        lock(&self.calls).push(UpstreamCall::Query {
            task_id: task_id.clone(),
            identity: identity.clone(),
        });
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
