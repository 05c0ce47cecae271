//! Core domain types, ports and services for the zimg gateway.
//!
//! This crate knows nothing about HTTP frameworks. It defines the session
//! identity the upstream requires, the task and status model, the
//! [`UpstreamTaskPort`] seam implemented by `zimg-upstream`, and the
//! [`ResultPoller`] shared by every delivery mode.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use domain::{
    AuthContext, DEFAULT_SIZE, DEFAULT_STEPS, QUEUED_PROGRESS, RUNNING_PROGRESS, SessionCookies,
    SessionIdentity, SubmittedTask, Task, TaskId, TaskParams, TaskStatus,
};
pub use error::{AuthContextError, GenerationError, SubmissionError};
pub use ports::UpstreamTaskPort;
pub use services::{
    DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, IdentityForge, PollSettings, ResultPoller,
    UpstreamProfile,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
