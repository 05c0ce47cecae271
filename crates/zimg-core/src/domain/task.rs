//! Generation task model.
//!
//! A task's lifecycle lives entirely upstream. The gateway only keeps what it
//! needs to re-query it: the task id and the identity that created it.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::SessionIdentity;

/// Image size used when the caller does not ask for one.
pub const DEFAULT_SIZE: &str = "1024x1024";

/// Sampling steps used when the caller does not ask for a count.
pub const DEFAULT_STEPS: u32 = 8;

/// Caller-tunable generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskParams {
    /// Output size as `WIDTHxHEIGHT`.
    pub size: String,
    /// Number of sampling steps.
    pub steps: u32,
    /// Fixed seed. `None` lets the upstream randomize.
    pub seed: Option<u64>,
}

impl Default for TaskParams {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE.to_string(),
            steps: DEFAULT_STEPS,
            seed: None,
        }
    }
}

impl TaskParams {
    /// Build params, falling back to defaults for anything not supplied.
    #[must_use]
    pub fn new(size: Option<String>, steps: Option<u32>, seed: Option<u64>) -> Self {
        Self {
            size: size
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SIZE.to_string()),
            steps: steps.filter(|s| *s > 0).unwrap_or(DEFAULT_STEPS),
            seed,
        }
    }

    /// True exactly when no seed was supplied.
    #[must_use]
    pub const fn randomized(&self) -> bool {
        self.seed.is_none()
    }
}

/// Gateway-assigned task identifier (`task_<unix-millis>_<random>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh id from the current time and a random suffix.
    #[must_use]
    pub fn generate() -> Self {
        let suffix: u32 = rand::rng().random_range(0..1_000_000);
        Self(format!("task_{}_{suffix}", Utc::now().timestamp_millis()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generation request as submitted upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub prompt: String,
    pub params: TaskParams,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with a freshly generated id.
    #[must_use]
    pub fn new(prompt: impl Into<String>, params: TaskParams) -> Self {
        Self {
            id: TaskId::generate(),
            prompt: prompt.into(),
            params,
            created_at: Utc::now(),
        }
    }
}

/// Result of a successful submission: everything needed to re-query the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTask {
    pub task_id: TaskId,
    pub identity: SessionIdentity,
}
