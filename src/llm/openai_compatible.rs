// ABOUTME: Generic OpenAI-compatible chat completion provider for cloud and local endpoints
// ABOUTME: Shared wire format for Groq, OpenAI, Ollama, vLLM and LocalAI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # `OpenAI`-Compatible Provider
//!
//! Implementation for any endpoint speaking the `OpenAI` chat completions API.
//!
//! ## Supported Backends
//!
//! - **`OpenAI`**: <https://api.openai.com/v1>
//! - **Groq**: <https://api.groq.com/openai/v1> (see [`super::GroqProvider`])
//! - **Ollama**: <http://localhost:11434/v1>
//! - **vLLM**: <http://localhost:8000/v1>
//!
//! Only non-streaming completions are supported.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmError, LlmProvider, TokenUsage};
use crate::errors::AppError;

// ============================================================================
// Configuration Constants
// ============================================================================

/// `OpenAI` cloud base URL
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default `OpenAI` model
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default model for local inference
const LOCAL_DEFAULT_MODEL: &str = "llama3.1:8b";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Transport-level request ceiling; the chat pipeline applies its own shorter bound
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Characters of an unparseable error body kept in messages
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    #[serde(default)]
    message: Option<OpenAiResponseMessage>,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens", default)]
    prompt: u32,
    #[serde(rename = "completion_tokens", default)]
    completion: u32,
    #[serde(rename = "total_tokens", default)]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging and error messages
    pub provider_name: &'static str,
    /// Provider display name
    pub display_name: String,
}

impl std::fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("provider_name", &self.provider_name)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleConfig {
    /// Configuration for the `OpenAI` cloud API
    #[must_use]
    pub fn openai(api_key: String, model: Option<String>) -> Self {
        let default_model = model.unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_owned());
        Self {
            base_url: OPENAI_BASE_URL.to_owned(),
            api_key: Some(api_key),
            display_name: format!("OpenAI ({default_model})"),
            default_model,
            provider_name: "openai",
        }
    }

    /// Configuration for a local server (Ollama, vLLM, `LocalAI`)
    #[must_use]
    pub fn local(base_url: String, api_key: Option<String>, model: Option<String>) -> Self {
        let default_model = model.unwrap_or_else(|| LOCAL_DEFAULT_MODEL.to_owned());
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            display_name: format!("Local LLM ({default_model})"),
            default_model,
            provider_name: "local",
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Provider configuration
    #[must_use]
    pub const fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url)
    }

    /// Attach the bearer token when one is configured
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Classify a transport failure
    fn transport_error(&self, context: &str, e: &reqwest::Error) -> LlmError {
        error!("{context} ({}): {e}", self.config.provider_name);
        LlmError::Unavailable {
            provider: self.config.provider_name,
            message: format!("{context}: {e}"),
        }
    }

    /// Parse error response from the API
    fn parse_error_response(&self, status: StatusCode, body: &str) -> LlmError {
        let message = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| {
                format!(
                    "API error ({status}): {}",
                    body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect::<String>()
                )
            },
            |parsed| {
                let error_type = parsed.error.error_type.unwrap_or_else(|| "unknown".to_owned());
                format!("{error_type} - {}", parsed.error.message)
            },
        );
        LlmError::from_status(self.config.provider_name, status.as_u16(), message)
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = %self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        if request.stream {
            return Err(LlmError::InvalidRequest {
                provider: self.config.provider_name,
                message: "streaming completions are not supported".to_owned(),
            });
        }

        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        debug!(
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let body = OpenAiRequest {
            model,
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .authorize(self.client.post(self.api_url("chat/completions")))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error("Failed to connect", &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error("Failed to read response", &e))?;

        if !status.is_success() {
            let err = self.parse_error_response(status, &text);
            warn!(status = status.as_u16(), kind = err.kind(), "Chat completion rejected");
            return Err(err);
        }

        let parsed: OpenAiResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse completion response: {e}");
            LlmError::Other {
                provider: self.config.provider_name,
                message: format!("Failed to parse response: {e}"),
            }
        })?;

        let (content, finish_reason) = parsed
            .choices
            .into_iter()
            .next()
            .map_or((None, None), |choice| {
                (
                    choice.message.and_then(|m| m.content),
                    choice.finish_reason,
                )
            });

        debug!(
            chars = content.as_deref().map_or(0, str::len),
            finish_reason = ?finish_reason,
            "Received chat completion"
        );

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or_else(|| model.to_owned()),
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason,
        })
    }
}
