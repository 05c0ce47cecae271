//! HTTP backend abstraction for the upstream endpoint.
//!
//! The client is generic over [`HttpBackend`] so unit tests can swap in a
//! fake that records requests and replays canned JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{UpstreamError, UpstreamResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can POST a JSON body and decode a JSON reply.
///
/// This is an implementation detail - external code should go through the
/// `UpstreamTaskPort` implementation.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST `body` to `url` with exactly the given headers.
    async fn post_json<B, T>(
        &self,
        url: &Url,
        headers: &[(String, String)],
        body: &B,
    ) -> UpstreamResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
///
/// No retries here: a failed create is surfaced to the caller, a failed
/// query is retried by the poller on its own cadence.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given request timeout.
    pub fn new(timeout: Duration) -> UpstreamResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

fn header_map(headers: &[(String, String)]) -> UpstreamResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = || UpstreamError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json<B, T>(
        &self,
        url: &Url,
        headers: &[(String, String)],
        body: &B,
    ) -> UpstreamResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let response = self
            .client
            .post(url.as_str())
            .headers(header_map(headers)?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::ApiRequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // The upstream does not always send a JSON content type, so decode by hand.
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_backend_creation() {
        assert!(ReqwestBackend::new(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_header_map_accepts_forged_headers() {
        let map = header_map(&[
            ("authority".to_string(), "z-image.62tool.com".to_string()),
            ("cookie".to_string(), "a=1; b=2".to_string()),
        ])
        .unwrap();
        assert_eq!(map["authority"], "z-image.62tool.com");
        assert_eq!(map["cookie"], "a=1; b=2");
    }

    #[test]
    fn test_header_map_rejects_bad_values() {
        let err = header_map(&[("x-bad".to_string(), "line\nbreak".to_string())]).unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidHeader { ref name } if name == "x-bad"));
    }
}
