//! Anthropic Messages API backend
//!
//! HTTP client for the Anthropic Messages API (`/v1/messages`). The provider
//! is treated as an untrusted text-in/text-out service: this module sends a
//! prompt and hands the raw reply text back to the caller, which does all
//! interpretation.
//!
//! # Configuration
//!
//! Environment variables:
//! - `ANTHROPIC_API_KEY`: API credential (required)
//! - `ANTHROPIC_MODEL`: Model name (default: `claude-3-5-sonnet-20241022`)
//! - `ANTHROPIC_BASE_URL`: API base URL (default: `https://api.anthropic.com`;
//!   override to point at a compatible server or a test mock)
//! - `ANTHROPIC_TIMEOUT_SECS`: Request timeout in seconds (default: `30`)

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::CompletionOptions;
use super::CompletionBackend;

/// Default model for categorization requests
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// API version header value required by the Messages API
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default request timeout. A categorization reply is a short JSON object;
/// anything slower than this is treated as a provider failure.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Messages API request
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

/// Message in conversation
#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: text.into(),
        }
    }
}

/// Messages API response
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

/// Content block in a response
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    /// Extract the concatenated text content, if any
    fn text(&self) -> Option<String> {
        let texts: Vec<_> = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }
}

/// Anthropic Messages API backend
#[derive(Clone)]
pub struct AnthropicBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    /// Create a new backend with the default request timeout
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self> {
        Self::with_timeout(
            base_url,
            api_key,
            model,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a new backend with a caller-supplied request timeout
    pub fn with_timeout(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Create from environment variables
    ///
    /// Fails with a configuration error when `ANTHROPIC_API_KEY` is not set
    /// or when `ANTHROPIC_TIMEOUT_SECS` is set but not a number. These are
    /// the failures that surface to an operator instead of degrading to an
    /// absent suggestion, and they are checked at construction, not per
    /// request.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| Error::Configuration("ANTHROPIC_API_KEY not configured".into()))?;
        let model =
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = match std::env::var("ANTHROPIC_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                Error::Configuration(format!("Invalid ANTHROPIC_TIMEOUT_SECS: {}", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Self::with_timeout(
            &base_url,
            &api_key,
            &model,
            Duration::from_secs(timeout_secs),
        )
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> Result<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            messages: vec![Message::user(prompt)],
        };

        debug!(
            model = %self.model,
            max_tokens = options.max_tokens,
            "Sending completion request"
        );

        let response = self
            .http_client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Messages API error ({}): {}",
                status, body
            )));
        }

        let messages_response: MessagesResponse = response.json().await?;

        debug!(
            stop_reason = ?messages_response.stop_reason,
            "Received completion response"
        );

        messages_response
            .text()
            .ok_or_else(|| Error::Provider("No text in provider response".into()))
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend =
            AnthropicBackend::new("https://api.anthropic.com/", "key", DEFAULT_MODEL).unwrap();
        assert_eq!(backend.host(), "https://api.anthropic.com");
        assert_eq!(backend.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_backend_with_timeout() {
        let backend = AnthropicBackend::with_timeout(
            DEFAULT_BASE_URL,
            "key",
            DEFAULT_MODEL,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(backend.host(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_model() {
        let backend = AnthropicBackend::new(DEFAULT_BASE_URL, "key", DEFAULT_MODEL).unwrap();
        let other = backend.with_model("claude-3-5-haiku-20241022");
        assert_eq!(other.model(), "claude-3-5-haiku-20241022");
        assert_eq!(other.host(), backend.host());
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{
            "content": [
                {"type": "text", "text": "{\"category\": \"Food\"}"},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}}
            ],
            "stop_reason": "end_turn"
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().unwrap(), "{\"category\": \"Food\"}");
    }

    #[test]
    fn test_response_without_text() {
        let json = r#"{"content": []}"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 150,
            temperature: 0.3,
            messages: vec![Message::user("categorize this")],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(DEFAULT_MODEL));
        assert!(json.contains("150"));
        assert!(json.contains("categorize this"));
    }
}
