//! Timeout-bounded, cancellable polling loop around [`UpstreamTaskPort::query`].
//!
//! All delivery modes that wait for an image go through [`ResultPoller`];
//! they differ only in how intermediate and final results are surfaced.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{SessionIdentity, TaskId, TaskStatus};
use crate::error::GenerationError;
use crate::ports::UpstreamTaskPort;

/// Delay between two status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Total wall-clock budget for one task.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Cadence and budget of a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl PollSettings {
    #[must_use]
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Polls one task until it reaches a terminal status.
#[derive(Debug, Clone)]
pub struct ResultPoller {
    upstream: Arc<dyn UpstreamTaskPort>,
    settings: PollSettings,
}

impl ResultPoller {
    #[must_use]
    pub fn new(upstream: Arc<dyn UpstreamTaskPort>, settings: PollSettings) -> Self {
        Self { upstream, settings }
    }

    /// Poll until the task succeeds (returning the image URL), fails, the
    /// budget runs out, or `cancel` fires.
    pub async fn poll_until(
        &self,
        task_id: &TaskId,
        identity: &SessionIdentity,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        self.poll_until_observed(task_id, identity, cancel, |_, _| {})
            .await
    }

    /// Like [`poll_until`](Self::poll_until), reporting every non-terminal
    /// status and its zero-based attempt index to `observe`.
    ///
    /// A transient query failure counts as an attempt and does not reset the
    /// clock. Returns `Timeout` on the first attempt that completes at or
    /// after `timeout`, so an always-queued task ends within
    /// `[timeout, timeout + interval]` plus query latency.
    pub async fn poll_until_observed<F>(
        &self,
        task_id: &TaskId,
        identity: &SessionIdentity,
        cancel: &CancellationToken,
        mut observe: F,
    ) -> Result<String, GenerationError>
    where
        F: FnMut(u32, &TaskStatus) + Send,
    {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(GenerationError::Cancelled),
                () = tokio::time::sleep(self.settings.interval) => {}
            }

            let status = self.upstream.query(task_id, identity).await;
            match status {
                TaskStatus::Succeeded { url } => {
                    debug!(task_id = %task_id, attempt, "Task succeeded");
                    return Ok(url);
                }
                TaskStatus::Failed { error } => {
                    debug!(task_id = %task_id, attempt, error = %error, "Task failed upstream");
                    return Err(GenerationError::Failed(error));
                }
                TaskStatus::TransientError { ref reason } => {
                    warn!(task_id = %task_id, attempt, reason = %reason, "Transient query error, retrying");
                }
                TaskStatus::Queued { .. } | TaskStatus::Running { .. } => {}
            }

            observe(attempt, &status);
            attempt = attempt.saturating_add(1);

            if started.elapsed() >= self.settings.timeout {
                debug!(task_id = %task_id, attempts = attempt, "Polling budget exhausted");
                return Err(GenerationError::Timeout(self.settings.timeout));
            }
        }
    }
}
