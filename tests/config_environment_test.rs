// ABOUTME: Integration tests for loading server configuration from the process environment
// ABOUTME: Runs serially because every test mutates shared environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use serial_test::serial;
use shantisaathi_server::config::{Environment, FallbackMode, LlmProviderType, ServerConfig};

const MANAGED_VARS: &[&str] = &[
    "NODE_ENV",
    "ENVIRONMENT",
    "HOST",
    "PORT",
    "FRONTEND_URL",
    "ALLOWED_ORIGINS",
    "CORS_ALLOWED_ORIGINS",
    "SHANTI_LLM_PROVIDER",
    "SHANTI_LLM_TIMEOUT_SECS",
    "SHANTI_FALLBACK",
    "GROQ_API_KEY",
    "OPENAI_API_KEY",
    "RATE_LIMIT_MAX_REQUESTS",
    "RATE_LIMIT_WINDOW_SECS",
];

fn with_env(vars: &[(&str, &str)], test: impl FnOnce()) {
    for key in MANAGED_VARS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }
    test();
    for key in MANAGED_VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_reads_process_environment() {
    with_env(
        &[
            ("GROQ_API_KEY", "gsk_from_env"),
            ("NODE_ENV", "production"),
            ("PORT", "8088"),
            ("FRONTEND_URL", "https://shanti.example"),
            ("SHANTI_FALLBACK", "echo"),
            ("RATE_LIMIT_MAX_REQUESTS", "25"),
            ("RATE_LIMIT_WINDOW_SECS", "60"),
        ],
        || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.http_port, 8088);
            assert_eq!(config.environment, Environment::Production);
            assert_eq!(config.llm.provider, LlmProviderType::Groq);
            assert_eq!(config.chat.fallback, FallbackMode::Echo);
            assert_eq!(config.rate_limit.max_requests, 25);
            assert_eq!(config.rate_limit.window().as_secs(), 60);
            assert!(config
                .cors
                .allowed_origins
                .contains(&"https://shanti.example".to_owned()));
        },
    );
}

#[test]
#[serial]
fn test_from_env_fails_without_provider_key() {
    with_env(&[("SHANTI_LLM_PROVIDER", "openai")], || {
        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    });
}

#[test]
#[serial]
fn test_legacy_environment_variable_is_honoured() {
    with_env(
        &[("GROQ_API_KEY", "k"), ("ENVIRONMENT", "testing")],
        || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.environment, Environment::Testing);
        },
    );
}

#[test]
#[serial]
fn test_summary_never_contains_the_key() {
    with_env(&[("GROQ_API_KEY", "gsk_do_not_print")], || {
        let config = ServerConfig::from_env().unwrap();
        let summary = config.summary_log();
        assert!(!summary.contains("gsk_do_not_print"));
        assert!(summary.contains("groq"));
    });
}
