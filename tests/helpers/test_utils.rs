// ABOUTME: Test utilities for driving the full HTTP stack without a real model
// ABOUTME: Scripted spy provider, map-backed configuration and app construction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use shantisaathi_server::{
    config::ServerConfig,
    llm::{ChatRequest, ChatResponse, LlmError, LlmProvider, TokenUsage},
    resources::ServerResources,
    server::build_app,
};

/// What the spy provider does on every call
#[derive(Clone)]
pub enum Behavior {
    /// Return this text (or no text)
    Reply(Option<String>),
    /// Fail with this error
    Fail(LlmError),
    /// Never answer within a test's lifetime
    Hang,
}

/// Provider that records every request and follows a fixed script
pub struct SpyProvider {
    behavior: Behavior,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl SpyProvider {
    /// Spy replying with `text`
    pub fn replying(text: &str) -> Arc<Self> {
        Self::with_behavior(Behavior::Reply(Some(text.to_owned())))
    }

    /// Spy failing with `error`
    pub fn failing(error: LlmError) -> Arc<Self> {
        Self::with_behavior(Behavior::Fail(error))
    }

    /// Spy following `behavior`
    pub fn with_behavior(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Number of completions requested so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most recent request
    pub fn last_request(&self) -> ChatRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("provider was never called")
    }
}

#[async_trait]
impl LlmProvider for SpyProvider {
    fn name(&self) -> &'static str {
        "spy"
    }

    fn display_name(&self) -> &str {
        "Spy Provider"
    }

    fn default_model(&self) -> &str {
        "spy-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match &self.behavior {
            Behavior::Reply(text) => Ok(ChatResponse {
                content: text.clone(),
                model: "spy-model".to_owned(),
                usage: Some(TokenUsage {
                    prompt_tokens: 20,
                    completion_tokens: 22,
                    total_tokens: 42,
                }),
                finish_reason: Some("stop".to_owned()),
            }),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::from_message("spy", "woke up"))
            }
        }
    }}

/// Configuration from a key map; a Groq key is supplied unless overridden
pub fn test_config(overrides: &[(&str, &str)]) -> ServerConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("GROQ_API_KEY".to_owned(), "test-key".to_owned()),
        ("NODE_ENV".to_owned(), "development".to_owned()),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_owned(), (*value).to_owned());
    }
    ServerConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test configuration")
}

/// Full application (routes plus middleware) around `provider`
pub fn test_app(provider: Arc<SpyProvider>, config: ServerConfig) -> Router {
    build_app(Arc::new(ServerResources::new(config, provider)))
}

/// Application with default test configuration
pub fn default_app(provider: Arc<SpyProvider>) -> Router {
    test_app(provider, test_config(&[]))
}
