// ABOUTME: Environment-based server configuration loaded once at startup
// ABOUTME: Network, CORS, LLM provider, chat pipeline and rate-limit settings with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Environment-only configuration.
//!
//! [`ServerConfig::from_env`] reads the process environment once. The same
//! parsing runs through [`ServerConfig::from_lookup`] so tests can feed a map
//! instead of mutating the environment.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::warn;

pub use super::types::{Environment, FallbackMode, LlmProviderType};
use crate::constants::{chat, network, rate_limits};

/// Default base URL for a local `OpenAI`-compatible server (Ollama)
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434/v1";

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Frontend URL, used for greeting text and always allowed by CORS
    pub frontend_url: String,
    /// Cross-origin settings
    pub cors: CorsConfig,
    /// Upstream model provider
    pub llm: LlmConfig,
    /// Chat pipeline tuning
    pub chat: ChatConfig,
    /// Per-client quota
    pub rate_limit: RateLimitConfig,
}

/// Cross-origin settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Allowed origins, or a single `*`
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Whether any origin is accepted
    #[must_use]
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Upstream provider settings
#[derive(Clone)]
pub struct LlmConfig {
    /// Which provider to construct
    pub provider: LlmProviderType,
    /// API key, required for cloud providers
    pub api_key: Option<String>,
    /// Base URL override (local provider)
    pub base_url: Option<String>,
    /// Model override, provider default when unset
    pub model: Option<String>,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Chat pipeline tuning
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Model call timeout in seconds
    pub timeout_secs: u64,
    /// Trailing history turns forwarded to the model
    pub history_window: usize,
    /// Maximum history turns a request may carry
    pub max_history: usize,
    /// Text used when the model returns nothing usable
    pub fallback: FallbackMode,
}

impl ChatConfig {
    /// Model call timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: chat::DEFAULT_TEMPERATURE,
            max_tokens: chat::DEFAULT_MAX_TOKENS,
            timeout_secs: chat::DEFAULT_TIMEOUT_SECS,
            history_window: chat::HISTORY_WINDOW,
            max_history: chat::MAX_HISTORY_TURNS,
            fallback: FallbackMode::default(),
        }
    }
}

/// Fixed-window quota per client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: rate_limits::DEFAULT_MAX_REQUESTS,
            window_secs: rate_limits::DEFAULT_WINDOW_SECS,
        }
    }
}

impl RateLimitConfig {
    /// Window as a duration
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the selected provider's API key is missing or a
    /// value is out of range
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if the selected provider's API key is missing or a
    /// value is out of range
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = get("NODE_ENV")
            .or_else(|| get("ENVIRONMENT"))
            .map(|s| Environment::from_str_or_default(&s))
            .unwrap_or_default();

        let frontend_url =
            get("FRONTEND_URL").unwrap_or_else(|| network::DEFAULT_FRONTEND_URL.to_owned());

        let origins = get("ALLOWED_ORIGINS").or_else(|| get("CORS_ALLOWED_ORIGINS"));
        let allowed_origins = parse_origins(origins.as_deref(), &frontend_url);

        let provider = get(LlmProviderType::ENV_VAR)
            .map(|s| LlmProviderType::from_str_or_default(&s))
            .unwrap_or_default();
        let api_key = get(provider.api_key_env_var());
        if provider.requires_api_key() && api_key.is_none() {
            bail!(
                "Missing {} environment variable (required by the {provider} provider)",
                provider.api_key_env_var()
            );
        }
        let base_url = match provider {
            LlmProviderType::Local => Some(
                get("LOCAL_LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LOCAL_BASE_URL.to_owned()),
            ),
            LlmProviderType::Groq | LlmProviderType::OpenAi => None,
        };

        let chat = ChatConfig {
            temperature: parse_or(&get, "SHANTI_LLM_TEMPERATURE", chat::DEFAULT_TEMPERATURE),
            max_tokens: parse_or(&get, "SHANTI_LLM_MAX_TOKENS", chat::DEFAULT_MAX_TOKENS),
            timeout_secs: parse_or(&get, "SHANTI_LLM_TIMEOUT_SECS", chat::DEFAULT_TIMEOUT_SECS),
            history_window: parse_or(&get, "SHANTI_HISTORY_WINDOW", chat::HISTORY_WINDOW),
            max_history: parse_or(&get, "SHANTI_MAX_HISTORY", chat::MAX_HISTORY_TURNS),
            fallback: get("SHANTI_FALLBACK")
                .map(|s| FallbackMode::from_str_or_default(&s))
                .unwrap_or_default(),
        };

        let rate_limit = RateLimitConfig {
            max_requests: parse_or(
                &get,
                "RATE_LIMIT_MAX_REQUESTS",
                rate_limits::DEFAULT_MAX_REQUESTS,
            ),
            window_secs: parse_or(&get, "RATE_LIMIT_WINDOW_SECS", rate_limits::DEFAULT_WINDOW_SECS),
        };

        let config = Self {
            host: get("HOST").unwrap_or_else(|| network::DEFAULT_HOST.to_owned()),
            http_port: parse_or(&get, "PORT", network::DEFAULT_PORT),
            environment,
            frontend_url,
            cors: CorsConfig { allowed_origins },
            llm: LlmConfig {
                provider,
                api_key,
                base_url,
                model: get(LlmProviderType::MODEL_ENV_VAR),
            },
            chat,
            rate_limit,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns an error describing the first out-of-range value
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            bail!(
                "SHANTI_LLM_TEMPERATURE must be between 0 and 2, got {}",
                self.chat.temperature
            );
        }
        if self.chat.max_tokens == 0 {
            bail!("SHANTI_LLM_MAX_TOKENS must be greater than zero");
        }
        if self.chat.timeout_secs == 0 {
            bail!("SHANTI_LLM_TIMEOUT_SECS must be greater than zero");
        }
        if self.chat.history_window == 0 {
            bail!("SHANTI_HISTORY_WINDOW must be greater than zero");
        }
        if self.rate_limit.max_requests == 0 || self.rate_limit.window_secs == 0 {
            bail!("RATE_LIMIT_MAX_REQUESTS and RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        Ok(())
    }

    /// One-line summary for startup logs, secrets excluded
    #[must_use]
    pub fn summary_log(&self) -> String {
        format!(
            "env={} bind={}:{} provider={} model={} timeout={}s history_window={} max_history={} rate_limit={}/{}s origins={}",
            self.environment,
            self.host,
            self.http_port,
            self.llm.provider,
            self.llm.model.as_deref().unwrap_or("default"),
            self.chat.timeout_secs,
            self.chat.history_window,
            self.chat.max_history,
            self.rate_limit.max_requests,
            self.rate_limit.window_secs,
            self.cors.allowed_origins.join(","),
        )
    }
}

/// Parse a value, keeping the default (with a warning) when it does not parse
fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: FromStr + fmt::Display + Copy,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {key}={raw}, using default {default}");
            default
        }),
        None => default,
    }
}

/// Parse comma-separated CORS origins, always including the frontend URL
fn parse_origins(origins: Option<&str>, frontend_url: &str) -> Vec<String> {
    let mut list: Vec<String> = match origins {
        Some(raw) if raw.trim() == "*" => return vec!["*".to_owned()],
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_owned())
            .filter(|s| !s.is_empty())
            .collect(),
        None => network::DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
    };

    let frontend = frontend_url.trim_end_matches('/');
    if !list.iter().any(|o| o == frontend) {
        list.push(frontend.to_owned());
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_groq_key() {
        let config = config_from(&[("GROQ_API_KEY", "gsk_test")]).unwrap();

        assert_eq!(config.http_port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.llm.provider, LlmProviderType::Groq);
        assert_eq!(config.chat, ChatConfig::default());
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:5174"]
        );
    }

    #[test]
    fn test_missing_credential_is_fatal() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));

        let err = config_from(&[("SHANTI_LLM_PROVIDER", "openai")]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let config = config_from(&[("SHANTI_LLM_PROVIDER", "ollama")]).unwrap();
        assert_eq!(config.llm.provider, LlmProviderType::Local);
        assert_eq!(config.llm.base_url.as_deref(), Some(DEFAULT_LOCAL_BASE_URL));
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_frontend_url_is_always_allowed() {
        let config = config_from(&[
            ("GROQ_API_KEY", "k"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example/"),
            ("FRONTEND_URL", "https://app.example"),
        ])
        .unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example", "https://app.example"]
        );

        let wildcard = config_from(&[("GROQ_API_KEY", "k"), ("ALLOWED_ORIGINS", "*")]).unwrap();
        assert!(wildcard.cors.allows_any());
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let config = config_from(&[
            ("GROQ_API_KEY", "k"),
            ("PORT", "not-a-port"),
            ("SHANTI_HISTORY_WINDOW", "4"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.chat.history_window, 4);
        assert_eq!(config.rate_limit.max_requests, 5);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(config_from(&[("GROQ_API_KEY", "k"), ("SHANTI_LLM_TEMPERATURE", "3.5")]).is_err());
        assert!(config_from(&[("GROQ_API_KEY", "k"), ("SHANTI_HISTORY_WINDOW", "0")]).is_err());
        assert!(config_from(&[("GROQ_API_KEY", "k"), ("RATE_LIMIT_WINDOW_SECS", "0")]).is_err());
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = config_from(&[("GROQ_API_KEY", "gsk_secret_value")]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("gsk_secret_value"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!config.summary_log().contains("gsk_secret_value"));
    }
}
