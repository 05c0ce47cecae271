//! Public configuration for the upstream client.

use std::time::Duration;

use zimg_core::UpstreamProfile;

/// Configuration for the upstream task client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use zimg_upstream::UpstreamClientConfig;
/// use std::time::Duration;
///
/// let config = UpstreamClientConfig::new()
///     .with_base_url("https://images.example.com/api.php")
///     .with_origin("https://images.example.com")
///     .with_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    /// Endpoint accepting `create` and `query` envelopes
    pub(crate) base_url: String,
    /// Site the forged identities pretend to browse from
    pub(crate) profile: UpstreamProfile,
    /// Per-request timeout
    pub(crate) timeout: Duration,
    /// Task type string sent in create envelopes
    pub(crate) task_type: String,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://z-image.62tool.com/api.php".to_string(),
            profile: UpstreamProfile::default(),
            timeout: Duration::from_secs(30),
            task_type: "text2img-z-image".to_string(),
        }
    }
}

impl UpstreamClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upstream endpoint.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the origin forged identities claim (also derives referer and authority).
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.profile = self.profile.with_origin(origin);
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn profile(&self) -> &UpstreamProfile {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UpstreamClientConfig::new();
        assert_eq!(config.base_url, "https://z-image.62tool.com/api.php");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.task_type, "text2img-z-image");
        assert_eq!(config.profile.origin, "https://z-image.62tool.com");
    }

    #[test]
    fn test_builder_pattern() {
        let config = UpstreamClientConfig::new()
            .with_base_url("http://127.0.0.1:9000/api.php")
            .with_origin("http://127.0.0.1:9000")
            .with_timeout(Duration::from_secs(5))
            .with_task_type("text2img-test");

        assert_eq!(config.base_url, "http://127.0.0.1:9000/api.php");
        assert_eq!(config.profile.referer, "http://127.0.0.1:9000/");
        assert_eq!(config.profile.authority, "127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.task_type, "text2img-test");
    }
}
