// ABOUTME: Unified LLM provider selector chosen once at startup from configuration
// ABOUTME: Wraps Groq, OpenAI and local OpenAI-compatible providers behind one type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # LLM Provider Selector
//!
//! Set `SHANTI_LLM_PROVIDER`:
//! - `groq` (default): Groq-hosted Llama models (requires `GROQ_API_KEY`)
//! - `openai`: `OpenAI` cloud (requires `OPENAI_API_KEY`)
//! - `local`/`ollama`/`vllm`: any `OpenAI`-compatible server at `LOCAL_LLM_BASE_URL`

use async_trait::async_trait;
use tracing::info;

use super::{
    ChatRequest, ChatResponse, GroqProvider, LlmError, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};
use crate::config::environment::{LlmConfig, DEFAULT_LOCAL_BASE_URL};
use crate::config::LlmProviderType;
use crate::errors::AppError;

/// Unified chat provider that wraps Groq, `OpenAI`, or a local LLM
pub enum ChatProvider {
    /// Groq provider for fast, cost-effective inference
    Groq(GroqProvider),
    /// `OpenAI` cloud provider
    OpenAi(OpenAiCompatibleProvider),
    /// Local LLM provider via `OpenAI`-compatible API (Ollama, vLLM, `LocalAI`)
    Local(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Create the configured provider
    ///
    /// # Errors
    ///
    /// Returns an error if a cloud provider has no API key or the HTTP client
    /// cannot be built
    pub fn from_config(config: &LlmConfig) -> Result<Self, AppError> {
        let missing_key = || {
            AppError::config(format!(
                "Missing {} environment variable",
                config.provider.api_key_env_var()
            ))
        };

        let provider = match config.provider {
            LlmProviderType::Groq => {
                let key = config.api_key.clone().ok_or_else(missing_key)?;
                Self::Groq(GroqProvider::new(key, config.model.clone())?)
            }
            LlmProviderType::OpenAi => {
                let key = config.api_key.clone().ok_or_else(missing_key)?;
                Self::OpenAi(OpenAiCompatibleProvider::new(
                    OpenAiCompatibleConfig::openai(key, config.model.clone()),
                )?)
            }
            LlmProviderType::Local => {
                let base_url = config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOCAL_BASE_URL.to_owned());
                Self::Local(OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::local(
                    base_url,
                    config.api_key.clone(),
                    config.model.clone(),
                ))?)
            }
        };

        info!(
            "Initialized LLM provider {} with model {} (set {} to change)",
            provider.display_name(),
            provider.default_model(),
            LlmProviderType::ENV_VAR
        );
        Ok(provider)
    }

    fn inner(&self) -> &dyn LlmProvider {
        match self {
            Self::Groq(p) => p,
            Self::OpenAi(p) | Self::Local(p) => p,
        }
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn display_name(&self) -> &str {
        self.inner().display_name()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.inner().complete(request).await
    }}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(provider: LlmProviderType, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: api_key.map(str::to_owned),
            base_url: None,
            model: None,
        }
    }

    #[test]
    fn test_selects_groq_by_default() {
        let provider =
            ChatProvider::from_config(&llm_config(LlmProviderType::Groq, Some("k"))).unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.default_model(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_local_uses_default_base_url() {
        let provider = ChatProvider::from_config(&llm_config(LlmProviderType::Local, None)).unwrap();
        assert_eq!(provider.name(), "local");
        assert!(matches!(provider, ChatProvider::Local(_)));
    }

    #[test]
    fn test_cloud_provider_without_key_fails() {
        let result = ChatProvider::from_config(&llm_config(LlmProviderType::OpenAi, None));
        assert!(result.is_err());
    }
}
