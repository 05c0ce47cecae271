//! Internal error types for upstream operations.
//!
//! These errors are internal to `zimg-upstream` and are mapped to core port
//! results at the boundary: [`SubmissionError`](zimg_core::SubmissionError)
//! for creates, a transient status for queries.

use thiserror::Error;

/// Result type alias for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Errors talking to the upstream endpoint.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Request completed with a non-success HTTP status.
    #[error("Upstream request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The upstream answered `success: false`.
    #[error("Upstream refused the request: {message}")]
    Refused {
        /// Message supplied by the upstream, if any
        message: String,
    },

    /// The upstream answered with something we cannot interpret.
    #[error("Invalid response from upstream: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// A forged header could not be encoded.
    #[error("Invalid request header '{name}'")]
    InvalidHeader {
        /// Offending header name
        name: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_failed_error_message() {
        let error = UpstreamError::ApiRequestFailed {
            status: 502,
            url: "https://z-image.62tool.com/api.php".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("api.php"));
    }

    #[test]
    fn test_refused_carries_message() {
        let error = UpstreamError::Refused {
            message: "rate limited".to_string(),
        };
        assert!(error.to_string().contains("rate limited"));
    }
}
