// ABOUTME: Groq LLM provider, the default backend for chat completions
// ABOUTME: Uses the OpenAI-compatible API for Llama models via Groq's LPU inference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # Groq Provider
//!
//! Set the `GROQ_API_KEY` environment variable with your API key from
//! Groq Console: <https://console.groq.com/keys>
//!
//! ## Supported Models
//!
//! - `llama-3.3-70b-versatile` (default): High-quality general purpose, good Indic coverage
//! - `llama-3.1-8b-instant`: Fast responses for simple tasks

use async_trait::async_trait;

use super::{
    ChatRequest, ChatResponse, LlmError, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};
use crate::errors::AppError;

/// Default model to use
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Base URL for the Groq API (OpenAI-compatible)
const API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq LLM provider using LPU-accelerated inference
pub struct GroqProvider {
    inner: OpenAiCompatibleProvider,
}

impl GroqProvider {
    /// Create a new Groq provider with the given API key
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(api_key: String, model: Option<String>) -> Result<Self, AppError> {
        let default_model = model.unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        let config = OpenAiCompatibleConfig {
            base_url: API_BASE_URL.to_owned(),
            api_key: Some(api_key),
            display_name: display_name_for(&default_model),
            default_model,
            provider_name: "groq",
        };
        Ok(Self {
            inner: OpenAiCompatibleProvider::new(config)?,
        })
    }
}

/// Health-check label, e.g. `Groq (Llama 3.3 70B)`
fn display_name_for(model: &str) -> String {
    match model {
        "llama-3.3-70b-versatile" => "Groq (Llama 3.3 70B)".to_owned(),
        "llama-3.1-8b-instant" => "Groq (Llama 3.1 8B)".to_owned(),
        other => format!("Groq ({other})"),
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn display_name(&self) -> &str {
        self.inner.display_name()
    }

    fn default_model(&self) -> &str {
        self.inner.default_model()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.inner.complete(request).await
    }}
