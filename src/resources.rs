// ABOUTME: Shared server state handed to every route and middleware
// ABOUTME: Holds configuration, the chat pipeline and the per-client rate limiter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::sync::Arc;

use crate::chat::ChatOrchestrator;
use crate::config::ServerConfig;
use crate::llm::LlmProvider;
use crate::rate_limiting::RequestRateLimiter;

/// Server-wide resources, created once at startup and shared via `Arc`
pub struct ServerResources {
    /// Startup configuration
    pub config: ServerConfig,
    /// Chat pipeline bound to the configured provider
    pub orchestrator: ChatOrchestrator,
    /// Per-IP quota for `/api` routes
    pub rate_limiter: RequestRateLimiter,
}

impl ServerResources {
    /// Build resources around an upstream provider
    #[must_use]
    pub fn new(config: ServerConfig, provider: Arc<dyn LlmProvider>) -> Self {
        let orchestrator = ChatOrchestrator::from_config(provider, &config);
        let rate_limiter = RequestRateLimiter::new(config.rate_limit);
        Self {
            config,
            orchestrator,
            rate_limiter,
        }
    }
}
