// ABOUTME: LLM provider abstraction layer for pluggable chat completion backends
// ABOUTME: Defines the provider contract, message types and the typed upstream failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # LLM Provider Service Provider Interface
//!
//! The chat pipeline depends only on [`LlmProvider`]. Vendor wire formats stay
//! inside the provider implementations, and every upstream failure arrives as
//! a typed [`LlmError`].
//!
//! ## Example: Using a Provider
//!
//! ```rust,no_run
//! use shantisaathi_server::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::system("You are a compassionate companion."),
//!         ChatMessage::user("I feel anxious today"),
//!     ])
//!     .with_temperature(0.7)
//!     .with_max_tokens(1000);
//!
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod groq;
mod openai_compatible;
mod provider;

pub use groq::GroqProvider;
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use provider::ChatProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{AppError, ErrorCode};

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse a wire role name
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Conversation messages, system first
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider default when unset)
    pub model: Option<String>,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Ask for a streamed completion
    pub stream: bool,
}

impl ChatRequest {
    /// Create a new non-streaming chat request
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
            stream: false,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request a streamed completion
    #[must_use]
    pub const fn with_streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Generated text, absent when the upstream sent none
    pub content: Option<String>,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Typed Upstream Failure
// ============================================================================

/// Failure reported by a provider, classified by cause
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// Upstream rejected the credential
    #[error("{provider} rejected the credential: {message}")]
    Unauthorized {
        /// Provider name
        provider: &'static str,
        /// Upstream detail
        message: String,
    },
    /// Upstream quota exhausted
    #[error("{provider} rate limit exceeded: {message}")]
    RateLimited {
        /// Provider name
        provider: &'static str,
        /// Upstream detail
        message: String,
    },
    /// Upstream rejected the request shape or model
    #[error("{provider} rejected the request: {message}")]
    InvalidRequest {
        /// Provider name
        provider: &'static str,
        /// Upstream detail
        message: String,
    },
    /// Network failure, timeout or upstream outage
    #[error("{provider} unavailable: {message}")]
    Unavailable {
        /// Provider name
        provider: &'static str,
        /// Upstream detail
        message: String,
    },
    /// Anything else
    #[error("{provider} error: {message}")]
    Other {
        /// Provider name
        provider: &'static str,
        /// Upstream detail
        message: String,
    },
}

impl LlmError {
    /// Classify an upstream HTTP failure
    ///
    /// The status decides whenever it carries meaning; message sniffing only
    /// runs for statuses that do not.
    #[must_use]
    pub fn from_status(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized { provider, message },
            429 => Self::RateLimited { provider, message },
            400 | 404 | 413 | 422 => Self::InvalidRequest { provider, message },
            408 | 500..=599 => Self::Unavailable { provider, message },
            _ => Self::from_message(provider, message),
        }
    }

    /// Classify a failure that has only a message
    #[must_use]
    pub fn from_message(provider: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("api key") || lower.contains("unauthorized") || lower.contains("401") {
            Self::Unauthorized { provider, message }
        } else if lower.contains("rate limit") || lower.contains("429") {
            Self::RateLimited { provider, message }
        } else if lower.contains("model") || lower.contains("400") {
            Self::InvalidRequest { provider, message }
        } else {
            Self::Other { provider, message }
        }
    }

    /// Short kind label for logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::RateLimited { .. } => "rate_limited",
            Self::InvalidRequest { .. } => "upstream_model_error",
            Self::Unavailable { .. } => "upstream_unavailable",
            Self::Other { .. } => "unknown",
        }
    }

    /// Error code this failure maps to
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized { .. } => ErrorCode::ExternalAuthFailed,
            Self::RateLimited { .. } => ErrorCode::ExternalRateLimited,
            Self::InvalidRequest { .. } => ErrorCode::ExternalModelRejected,
            Self::Unavailable { .. } => ErrorCode::ExternalServiceUnavailable,
            Self::Other { .. } => ErrorCode::ExternalServiceError,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(error: LlmError) -> Self {
        Self::new(error.error_code(), error.to_string()).with_source(error)
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
///
/// Implementations must be `Send + Sync`; one instance serves every request.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "groq", "openai")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &str;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a non-streaming chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}
