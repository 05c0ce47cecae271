//! Gateway configuration.

use std::path::PathBuf;
use std::time::Duration;

use zimg_core::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, PollSettings};

/// Models advertised by `/v1/models`.
pub const DEFAULT_MODELS: [&str; 2] = ["z-image-turbo", "dall-e-3"];

/// Poll interval for blocking chat completions.
pub const CHAT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Chunks buffered between a streaming task and its response body.
const DEFAULT_STREAM_BUFFER: usize = 16;

/// Configuration for the HTTP gateway.
///
/// # Example
///
/// ```
/// use zimg_gateway::GatewayConfig;
/// use std::time::Duration;
///
/// let config = GatewayConfig::new("sk-local")
///     .with_poll_interval(Duration::from_millis(500))
///     .with_poll_timeout(Duration::from_secs(30));
/// assert_eq!(config.default_model(), "z-image-turbo");
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub(crate) api_key: String,
    pub(crate) models: Vec<String>,
    /// Polling for `/v1/images/generations` in blocking mode.
    pub(crate) image_polling: PollSettings,
    /// Polling behind streaming chat completions.
    pub(crate) stream_polling: PollSettings,
    /// Polling for non-streaming chat completions.
    pub(crate) chat_polling: PollSettings,
    pub(crate) stream_buffer: usize,
    /// Directory served for unknown paths (operator console).
    pub(crate) console_dir: Option<PathBuf>,
}

impl GatewayConfig {
    /// Configuration with default cadence, guarded by `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = PollSettings::new(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT);
        Self {
            api_key: api_key.into(),
            models: DEFAULT_MODELS.iter().map(ToString::to_string).collect(),
            image_polling: defaults,
            stream_polling: defaults,
            chat_polling: defaults.with_interval(CHAT_POLL_INTERVAL),
            stream_buffer: DEFAULT_STREAM_BUFFER,
            console_dir: None,
        }
    }

    /// Replace the advertised model list. The first entry is the default.
    #[must_use]
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        if !models.is_empty() {
            self.models = models;
        }
        self
    }

    /// Interval for image and streaming polls. Blocking chat keeps its own.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.image_polling = self.image_polling.with_interval(interval);
        self.stream_polling = self.stream_polling.with_interval(interval);
        self
    }

    /// Budget applied to every delivery mode.
    #[must_use]
    pub const fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.image_polling = self.image_polling.with_timeout(timeout);
        self.stream_polling = self.stream_polling.with_timeout(timeout);
        self.chat_polling = self.chat_polling.with_timeout(timeout);
        self
    }

    #[must_use]
    pub const fn with_chat_polling(mut self, settings: PollSettings) -> Self {
        self.chat_polling = settings;
        self
    }

    #[must_use]
    pub fn with_console_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.console_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Model reported when a request does not name one.
    #[must_use]
    pub fn default_model(&self) -> &str {
        self.models.first().map_or(DEFAULT_MODELS[0], String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new("key");
        assert_eq!(config.models, vec!["z-image-turbo", "dall-e-3"]);
        assert_eq!(config.image_polling.interval, Duration::from_millis(1500));
        assert_eq!(config.image_polling.timeout, Duration::from_secs(60));
        assert_eq!(config.chat_polling.interval, Duration::from_secs(2));
        assert!(config.console_dir.is_none());
    }

    #[test]
    fn test_poll_overrides() {
        let config = GatewayConfig::new("key")
            .with_poll_interval(Duration::from_millis(100))
            .with_poll_timeout(Duration::from_secs(5));

        assert_eq!(config.stream_polling.interval, Duration::from_millis(100));
        assert_eq!(config.chat_polling.interval, CHAT_POLL_INTERVAL);
        assert_eq!(config.chat_polling.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_model_list_is_ignored() {
        let config = GatewayConfig::new("key").with_models(Vec::new());
        assert_eq!(config.default_model(), "z-image-turbo");

        let config = GatewayConfig::new("key").with_models(vec!["custom".to_string()]);
        assert_eq!(config.default_model(), "custom");
    }
}
