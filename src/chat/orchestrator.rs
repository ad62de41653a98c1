// ABOUTME: Runs one chat turn: validate, compose, call the model once, normalize
// ABOUTME: Maps typed upstream failures and timeouts onto the application error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, instrument};

use super::normalizer::ResponseNormalizer;
use super::prompt::PromptComposer;
use super::validator::MessageValidator;
use crate::config::ServerConfig;
use crate::constants::chat;
use crate::errors::{AppError, AppResult};
use crate::languages::Language;
use crate::llm::{ChatRequest, LlmProvider};
use crate::logging::{preview, AppLogger};

/// Model parameters applied to every completion
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Model override, provider default when unset
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Bound on the single model call
    pub timeout: Duration,
    /// Return raw causes of unclassified failures (development only)
    pub expose_debug: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: None,
            temperature: chat::DEFAULT_TEMPERATURE,
            max_tokens: chat::DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(chat::DEFAULT_TIMEOUT_SECS),
            expose_debug: false,
        }
    }
}

/// Result of a successful chat turn
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Normalized, non-empty reply
    pub text: String,
    /// When the reply was produced
    pub timestamp: DateTime<Utc>,
    /// Language the reply was requested in
    pub language: &'static Language,
    /// Provider display name
    pub provider: String,
    /// Model that produced the reply
    pub model: String,
    /// Total tokens reported by the provider
    pub tokens_used: Option<u32>,
    /// The fallback text replaced an unusable completion
    pub fallback_used: bool,
}

/// Per-request chat pipeline
pub struct ChatOrchestrator {
    provider: Arc<dyn LlmProvider>,
    validator: MessageValidator,
    composer: PromptComposer,
    normalizer: ResponseNormalizer,
    settings: ChatSettings,
}

impl ChatOrchestrator {
    /// Assemble an orchestrator from explicit parts
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        validator: MessageValidator,
        composer: PromptComposer,
        normalizer: ResponseNormalizer,
        settings: ChatSettings,
    ) -> Self {
        Self {
            provider,
            validator,
            composer,
            normalizer,
            settings,
        }
    }

    /// Orchestrator configured from server settings
    #[must_use]
    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &ServerConfig) -> Self {
        Self::new(
            provider,
            MessageValidator::new(config.chat.max_history),
            PromptComposer::new(config.chat.history_window),
            ResponseNormalizer::new(config.chat.fallback),
            ChatSettings {
                model: config.llm.model.clone(),
                temperature: config.chat.temperature,
                max_tokens: config.chat.max_tokens,
                timeout: config.chat.timeout(),
                expose_debug: config.environment.is_development(),
            },
        )
    }

    /// Provider behind this pipeline
    #[must_use]
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Handle a raw request body
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for undecodable JSON, otherwise as [`Self::handle`]
    pub async fn handle_raw(&self, body: &[u8]) -> AppResult<ChatReply> {
        let value: Value = serde_json::from_slice(body)?;
        self.handle(&value).await
    }

    /// Handle a decoded request body
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` without contacting the provider when validation
    /// fails, or the classified upstream failure
    #[instrument(skip_all, fields(provider = %self.provider.name()))]
    pub async fn handle(&self, body: &Value) -> AppResult<ChatReply> {
        let started = Instant::now();

        let request = self.validator.validate(body).map_err(|e| {
            debug!(violations = e.violations().len(), "Rejected chat request");
            AppError::from(e)
        })?;

        let messages = self.composer.compose(&request);
        let mut completion = ChatRequest::new(messages)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);
        if let Some(model) = &self.settings.model {
            completion = completion.with_model(model.clone());
        }

        let response = match timeout(self.settings.timeout, self.provider.complete(&completion)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(llm_error)) => {
                AppLogger::log_chat_failure(
                    llm_error.kind(),
                    &llm_error.to_string(),
                    elapsed_ms(started),
                );
                return Err(AppError::from(llm_error).with_debug_exposed(self.settings.expose_debug));
            }
            Err(_) => {
                let detail = format!("timed out after {}s", self.settings.timeout.as_secs_f32());
                AppLogger::log_chat_failure("upstream_unavailable", &detail, elapsed_ms(started));
                return Err(AppError::external_unavailable(self.provider.name(), detail));
            }
        };

        let normalized = self
            .normalizer
            .normalize(response.content.as_deref(), &request.message);
        let tokens_used = response.usage.map(|u| u.total_tokens);

        AppLogger::log_chat_turn(
            request.language.code,
            &response.model,
            &preview(&request.message, chat::LOG_PREVIEW_CHARS),
            normalized.text.chars().count(),
            tokens_used,
            normalized.fallback_used,
            elapsed_ms(started),
        );

        Ok(ChatReply {
            text: normalized.text,
            timestamp: Utc::now(),
            language: request.language,
            provider: self.provider.display_name().to_owned(),
            model: response.model,
            tokens_used,
            fallback_used: normalized.fallback_used,
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackMode;
    use crate::errors::ErrorCode;
    use crate::llm::{ChatResponse, LlmError, MessageRole, TokenUsage};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Script {
        Reply(Option<&'static str>),
        Fail(LlmError),
        Hang,
    }

    struct ScriptedProvider {
        script: Script,
        calls: AtomicUsize,
        last_request: Mutex<Option<ChatRequest>>,
    }

    impl ScriptedProvider {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn display_name(&self) -> &str {
            "Scripted Provider"
        }

        fn default_model(&self) -> &str {
            "scripted-model"
        }

        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.script {
                Script::Reply(text) => Ok(ChatResponse {
                    content: text.map(str::to_owned),
                    model: "scripted-model".to_owned(),
                    usage: Some(TokenUsage {
                        prompt_tokens: 10,
                        completion_tokens: 5,
                        total_tokens: 15,
                    }),
                    finish_reason: Some("stop".to_owned()),
                }),
                Script::Fail(err) => Err(err.clone()),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(LlmError::from_message("scripted", "unreachable"))
                }
            }
        }
    }

    fn orchestrator(provider: Arc<ScriptedProvider>, settings: ChatSettings) -> ChatOrchestrator {
        ChatOrchestrator::new(
            provider,
            MessageValidator::default(),
            PromptComposer::default(),
            ResponseNormalizer::new(FallbackMode::Apology),
            settings,
        )
    }

    #[tokio::test]
    async fn test_successful_turn() {
        let provider = ScriptedProvider::new(Script::Reply(Some("नमस्ते! 😊")));
        let chat = orchestrator(provider.clone(), ChatSettings::default());

        let reply = chat
            .handle(&json!({"message": "hello", "language": "hindi"}))
            .await
            .unwrap();

        assert_eq!(reply.text, "नमस्ते! 😊");
        assert_eq!(reply.language.full_name, "हिंदी (Hindi)");
        assert_eq!(reply.tokens_used, Some(15));
        assert_eq!(reply.provider, "Scripted Provider");
        assert_eq!(reply.model, "scripted-model");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let sent = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.messages.len(), 2);
        assert_eq!(sent.messages[0].role, MessageRole::System);
        assert_eq!(sent.temperature, Some(0.7));
        assert_eq!(sent.max_tokens, Some(1000));
        assert!(!sent.stream);
    }

    #[tokio::test]
    async fn test_invalid_requests_never_reach_provider() {
        let provider = ScriptedProvider::new(Script::Reply(Some("unused")));
        let chat = orchestrator(provider.clone(), ChatSettings::default());

        for body in [
            json!({"message": ""}),
            json!({"message": "   "}),
            json!({"message": "a".repeat(2001)}),
        ] {
            let err = chat.handle(&body).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput);
        }
        let err = chat.handle_raw(b"{broken").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failures_are_classified() {
        let cases = [
            (LlmError::from_status("scripted", 401, "bad key"), 401),
            (LlmError::from_status("scripted", 429, "slow down"), 429),
            (LlmError::from_status("scripted", 400, "bad model"), 400),
            (LlmError::from_status("scripted", 503, "down"), 502),
            (LlmError::from_message("scripted", "weird"), 500),
        ];
        for (error, status) in cases {
            let provider = ScriptedProvider::new(Script::Fail(error));
            let chat = orchestrator(provider.clone(), ChatSettings::default());
            let err = chat.handle(&json!({"message": "hi"})).await.unwrap_err();
            assert_eq!(err.http_status(), status);
            assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_timeout_maps_to_unavailable() {
        let provider = ScriptedProvider::new(Script::Hang);
        let settings = ChatSettings {
            timeout: Duration::from_millis(50),
            ..ChatSettings::default()
        };
        let chat = orchestrator(provider, settings);

        let err = chat.handle(&json!({"message": "hi"})).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
        assert_eq!(err.http_status(), 502);
    }

    #[tokio::test]
    async fn test_empty_completion_uses_fallback() {
        let provider = ScriptedProvider::new(Script::Reply(None));
        let chat = orchestrator(provider, ChatSettings::default());

        let reply = chat.handle(&json!({"message": "hi"})).await.unwrap();
        assert!(reply.fallback_used);
        assert_eq!(reply.text, chat::APOLOGY_TEXT);
    }

    #[tokio::test]
    async fn test_debug_detail_only_when_exposed() {
        let provider = ScriptedProvider::new(Script::Fail(LlmError::from_message("scripted", "kaboom")));
        let dev = orchestrator(
            provider,
            ChatSettings {
                expose_debug: true,
                ..ChatSettings::default()
            },
        );
        let body = dev.handle(&json!({"message": "hi"})).await.unwrap_err().to_response_body();
        assert!(body.debug.unwrap().contains("kaboom"));
    }

    #[tokio::test]
    async fn test_model_override_is_forwarded() {
        let provider = ScriptedProvider::new(Script::Reply(Some("ok")));
        let chat = orchestrator(
            provider.clone(),
            ChatSettings {
                model: Some("custom-model".to_owned()),
                ..ChatSettings::default()
            },
        );
        chat.handle(&json!({"message": "hi"})).await.unwrap();
        let sent = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.model.as_deref(), Some("custom-model"));
    }
}
