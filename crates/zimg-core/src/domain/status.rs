//! Task status as projected from one upstream poll.

use serde::Serialize;

/// Progress reported while the task waits in the upstream queue.
pub const QUEUED_PROGRESS: u8 = 10;

/// Progress reported while the upstream is rendering.
pub const RUNNING_PROGRESS: u8 = 50;

/// Status of an upstream task, recomputed on every poll.
///
/// Serializes to the status-query projection:
/// `{"status": "...", "url"?, "error"?, "progress"?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    Queued {
        progress: u8,
    },
    Running {
        progress: u8,
    },
    Succeeded {
        url: String,
    },
    Failed {
        error: String,
    },
    /// The poll itself failed. Treated as "try again", never as failure.
    TransientError {
        #[serde(skip_serializing)]
        reason: String,
    },
}

impl TaskStatus {
    #[must_use]
    pub const fn queued() -> Self {
        Self::Queued {
            progress: QUEUED_PROGRESS,
        }
    }

    #[must_use]
    pub const fn running() -> Self {
        Self::Running {
            progress: RUNNING_PROGRESS,
        }
    }

    #[must_use]
    pub fn succeeded(url: impl Into<String>) -> Self {
        Self::Succeeded { url: url.into() }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    #[must_use]
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::TransientError {
            reason: reason.into(),
        }
    }

    /// `Succeeded` and `Failed` end polling.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }
}
