// ABOUTME: Main library entry point for the ShantiSaathi chat relay
// ABOUTME: HTTP chat API over a hosted language model plus the terminal client building blocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # ShantiSaathi Server
//!
//! A multilingual mental-wellness chat relay. A client posts one user turn
//! with its recent history; the server validates it, frames it with a
//! per-language system directive, asks the configured model for exactly one
//! completion and returns a cleaned-up reply.
//!
//! ## Features
//!
//! - **Eleven languages**: English, Hindi and nine other Indian languages
//! - **Pluggable providers**: Groq, `OpenAI` or any local `OpenAI`-compatible server
//! - **Per-client rate limiting**: fixed window per IP on every `/api` route
//! - **Terminal client**: chat REPL with persisted preferences and spoken replies
//!
//! ## Architecture
//!
//! - **Chat**: validator, prompt composer, response normalizer and the orchestrator tying them together
//! - **LLM**: provider trait with typed failures and `OpenAI`-compatible implementations
//! - **Routes / Middleware**: axum handlers, CORS, request tracing and the rate limiter
//! - **Client / Voice**: HTTP client, transcript, preferences and playback control for the CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use shantisaathi_server::config::environment::ServerConfig;
//! use shantisaathi_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("ShantiSaathi configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by binary crates (src/bin/) and integration tests (tests/).

/// Chat pipeline: validation, prompt composition, normalization, orchestration
pub mod chat;

/// Terminal client building blocks: API client, transcript, preferences
pub mod client;

/// Environment-based configuration
pub mod config;

/// Application constants and user-facing texts
pub mod constants;

/// Unified error handling
pub mod errors;

/// Supported languages
pub mod languages;

/// Language model providers
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (CORS, tracing, rate limiting)
pub mod middleware;

/// Per-client request quota
pub mod rate_limiting;

/// Shared server state
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Server assembly and lifecycle
pub mod server;

/// Speech playback and capture control
pub mod voice;
