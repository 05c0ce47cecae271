//! OpenAI API data models for request/response handling.
//!
//! Domain types live in `zimg-core`; this module handles the API layer
//! mapping. Request types are deliberately lenient: numeric fields accept
//! numeric strings, and chat content may be a string or a list of parts.

use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use zimg_core::{AuthContext, TaskId, TaskParams};

// =============================================================================
// Lenient number parsing
// =============================================================================

/// Accept `42`, `42.0`, `"42"`, `"42.0"`, `null` or a blank string.
///
/// Fractional values are rejected rather than truncated.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Float(f64),
        Text(String),
    }

    let out_of_range = |n: u64| D::Error::custom(format!("number {n} is out of range"));
    let from_float = |f: f64| {
        whole_number(f)
            .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {f}")))
            .and_then(|n| T::try_from(n).map_err(|_| out_of_range(n)))
    };

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => T::try_from(n).map(Some).map_err(|_| out_of_range(n)),
        Some(Raw::Float(f)) => from_float(f).map(Some),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => {
            let trimmed = text.trim();
            if let Ok(value) = trimmed.parse() {
                return Ok(Some(value));
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("expected a number, got '{text}'")))
                .and_then(from_float)
                .map(Some)
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn whole_number(f: f64) -> Option<u64> {
    // 2^64 as f64; anything at or above it does not fit.
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;
    (f.is_finite() && f.fract() == 0.0 && (0.0..LIMIT).contains(&f)).then(|| f as u64)
}

// =============================================================================
// Image Generation Types
// =============================================================================

/// Request to `/v1/images/generations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageGenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Output size as `WIDTHxHEIGHT`.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub steps: Option<u32>,
    /// Alias of `steps`; `steps` wins when both are present.
    #[serde(default, deserialize_with = "number_or_string")]
    pub n_steps: Option<u32>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub seed: Option<u64>,
    /// Return a handoff token instead of waiting for the image.
    #[serde(default)]
    pub client_poll: bool,
}

impl ImageGenerationRequest {
    pub fn params(&self) -> TaskParams {
        TaskParams::new(self.size.clone(), self.steps.or(self.n_steps), self.seed)
    }
}

/// Blocking response of `/v1/images/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub created: i64,
    pub data: Vec<ImageData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    pub url: String,
}

/// Handoff response of `/v1/images/generations` with `client_poll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffResponse {
    /// Always `"submitted"`.
    pub status: String,
    pub task_id: TaskId,
    pub auth_context: AuthContext,
}

/// Request to `/v1/query/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQueryRequest {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub auth_context: Option<String>,
}

// =============================================================================
// Chat Completion Request/Response Types
// =============================================================================

/// Request to `/v1/chat/completions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Streams unless explicitly `false`.
    #[serde(default)]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    pub fn wants_stream(&self) -> bool {
        self.stream != Some(false)
    }

    /// The prompt is the text of the last message, whatever its role.
    pub fn prompt(&self) -> Option<String> {
        self.messages
            .last()
            .and_then(|message| message.content.as_ref())
            .map(MessageContent::text)
            .filter(|text| !text.trim().is_empty())
    }
}

/// A single incoming chat message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Message content: plain text or a list of typed parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Plain text of the content; text parts are joined by newlines, other
    /// parts are ignored.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter(|part| part.kind == "text")
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Response from `/v1/chat/completions` (non-streaming).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

/// Streaming chunk from `/v1/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChunkChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChunkChoice {
    pub index: u32,
    pub delta: ChatDelta,
    /// Serialized as `null` until the terminal chunk.
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatDelta {
    /// Content-only delta.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            role: None,
            content: Some(content.into()),
        }
    }
}

// =============================================================================
// Models Endpoint Types
// =============================================================================

/// Response from `/v1/models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

impl ModelsResponse {
    pub fn from_names(names: &[String], created: i64) -> Self {
        Self {
            object: "list".to_string(),
            data: names
                .iter()
                .map(|name| ModelInfo {
                    id: name.clone(),
                    object: "model".to_string(),
                    created,
                    owned_by: "zimage".to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

// =============================================================================
// Error Response Types
// =============================================================================

/// Error response matching OpenAI format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(
        message: impl Into<String>,
        error_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: code.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_request_accepts_string_numbers() {
        let request: ImageGenerationRequest = serde_json::from_value(json!({
            "prompt": "fox",
            "seed": "123",
            "n_steps": "6"
        }))
        .unwrap();

        let params = request.params();
        assert_eq!(params.seed, Some(123));
        assert_eq!(params.steps, 6);
        assert!(!params.randomized());
    }

    #[test]
    fn test_image_request_defaults() {
        let request: ImageGenerationRequest =
            serde_json::from_value(json!({"prompt": "fox", "seed": null, "steps": ""})).unwrap();

        let params = request.params();
        assert_eq!(params, TaskParams::default());
        assert!(!request.client_poll);
    }

    #[test]
    fn test_steps_wins_over_n_steps() {
        let request: ImageGenerationRequest =
            serde_json::from_value(json!({"prompt": "fox", "steps": 12, "n_steps": 4})).unwrap();
        assert_eq!(request.params().steps, 12);
    }

    #[test]
    fn test_image_request_accepts_whole_floats() {
        let request: ImageGenerationRequest = serde_json::from_value(json!({
            "prompt": "fox",
            "seed": 12.0,
            "steps": "8.0"
        }))
        .unwrap();

        let params = request.params();
        assert_eq!(params.seed, Some(12));
        assert_eq!(params.steps, 8);
    }

    #[test]
    fn test_fractional_numbers_are_rejected() {
        for body in [
            json!({"prompt": "fox", "seed": 12.5}),
            json!({"prompt": "fox", "steps": "7.25"}),
            json!({"prompt": "fox", "seed": -3.0}),
        ] {
            let result: Result<ImageGenerationRequest, _> = serde_json::from_value(body);
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_non_numeric_seed_is_rejected() {
        let result: Result<ImageGenerationRequest, _> =
            serde_json::from_value(json!({"prompt": "fox", "seed": "abc"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_prompt_from_last_message() {
        let request: ChatCompletionRequest = serde_json::from_value(json!({
            "messages": [
                {"role": "system", "content": "be nice"},
                {"role": "user", "content": [
                    {"type": "text", "text": "a red fox"},
                    {"type": "image_url", "image_url": {"url": "http://x"}},
                    {"type": "text", "text": "in snow"}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(request.prompt().as_deref(), Some("a red fox\nin snow"));
        assert!(request.wants_stream());
    }

    #[test]
    fn test_chat_without_prompt() {
        let request: ChatCompletionRequest =
            serde_json::from_value(json!({"messages": [], "stream": false})).unwrap();
        assert!(request.prompt().is_none());
        assert!(!request.wants_stream());

        let request: ChatCompletionRequest =
            serde_json::from_value(json!({"messages": [{"role": "user", "content": "  "}]}))
                .unwrap();
        assert!(request.prompt().is_none());
    }

    #[test]
    fn test_models_response_shape() {
        let response = ModelsResponse::from_names(&["z-image-turbo".to_string()], 1_700_000_000);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "object": "list",
                "data": [{
                    "id": "z-image-turbo",
                    "object": "model",
                    "created": 1_700_000_000,
                    "owned_by": "zimage"
                }]
            })
        );
    }
}
