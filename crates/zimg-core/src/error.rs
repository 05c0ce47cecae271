//! Error taxonomy for task submission and result delivery.
//!
//! Transient query failures are not errors here: they surface as
//! [`TaskStatus::TransientError`](crate::TaskStatus::TransientError) and are
//! retried by the poller.

use std::time::Duration;

use thiserror::Error;

/// The upstream did not accept a create request.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The upstream answered but refused the task.
    #[error("Upstream refused the task: {message}")]
    Rejected { message: String },

    /// The create call returned a non-success HTTP status.
    #[error("Upstream create request failed with status {status}")]
    HttpStatus { status: u16 },

    /// The create call never completed.
    #[error("Upstream create request failed: {0}")]
    Transport(String),

    /// The acknowledgement could not be understood.
    #[error("Invalid create acknowledgement: {0}")]
    InvalidResponse(String),
}

/// Why a generation request did not produce an image.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The upstream reported the task as failed.
    #[error("Generation failed: {0}")]
    Failed(String),

    /// The polling budget ran out before a terminal status.
    #[error("Timed out after {0:?} waiting for the image")]
    Timeout(Duration),

    /// Polling was cancelled (client went away or server shutting down).
    #[error("Generation cancelled")]
    Cancelled,
}

/// An `auth_context` token that cannot be turned back into an identity.
#[derive(Debug, Error)]
pub enum AuthContextError {
    #[error("auth_context is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("auth_context does not carry a session identity: {0}")]
    Json(#[from] serde_json::Error),
}
