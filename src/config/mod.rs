// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration read once at process start
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Configuration module
//!
//! - **Environment**: server configuration from environment variables
//! - **Types**: environment, provider and fallback enums

/// Environment and server configuration
pub mod environment;
/// Shared configuration enums
pub mod types;

pub use environment::{ChatConfig, CorsConfig, LlmConfig, RateLimitConfig, ServerConfig};
pub use types::{Environment, FallbackMode, LlmProviderType};
