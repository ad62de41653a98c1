// ABOUTME: Unified error handling with error codes, HTTP status mapping and JSON envelopes
// ABOUTME: Every failure leaving the HTTP surface is rendered through AppError::into_response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # Unified Error Handling System
//!
//! Defines the error codes used across the server, their HTTP status mapping,
//! the stable user-facing text for each code, and the `{success:false, ...}`
//! response envelope sent to clients.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::messages;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Local rate limiting (2000-2999)
    /// Local per-client quota exhausted
    #[serde(rename = "RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded = 2000,

    // Validation (3000-3999)
    /// Request failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // Resource Management (4000-4999)
    /// Route or resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // External Services (5000-5999)
    /// Upstream failed in a way we could not classify
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Upstream timed out or could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Upstream rejected our credential
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// Upstream quota exhausted
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,
    /// Upstream rejected the request shape or model
    #[serde(rename = "EXTERNAL_MODEL_REJECTED")]
    ExternalModelRejected = 5004,

    // Configuration (6000-6999)
    /// Configuration error encountered
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Configuration value is invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Internal server error
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::ExternalModelRejected => 400,

            // 401 Unauthorized
            Self::ExternalAuthFailed => 401,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 429 Too Many Requests
            Self::RateLimitExceeded | Self::ExternalRateLimited => 429,

            // 502 Bad Gateway
            Self::ExternalServiceUnavailable => 502,

            // 500 Internal Server Error
            Self::ExternalServiceError
            | Self::ConfigError
            | Self::ConfigInvalid
            | Self::InternalError => 500,
        }
    }

    /// Get a description of this error for logs
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded => "Local rate limit exceeded",
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ExternalModelRejected => "External service rejected the model request",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
        }
    }

    /// Stable text shown to clients in the `error` field
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => messages::INVALID_REQUEST,
            Self::ExternalAuthFailed => messages::INVALID_API_KEY,
            Self::RateLimitExceeded => messages::LOCAL_RATE_LIMITED,
            Self::ExternalRateLimited => messages::UPSTREAM_RATE_LIMITED,
            Self::ExternalModelRejected => messages::MODEL_ERROR,
            Self::ExternalServiceUnavailable => messages::UPSTREAM_UNAVAILABLE,
            Self::ResourceNotFound => messages::ENDPOINT_NOT_FOUND,
            Self::ExternalServiceError
            | Self::ConfigError
            | Self::ConfigInvalid
            | Self::InternalError => messages::CHAT_FAILED,
        }
    }

    /// Whether the raw message may be surfaced as `debug` in development
    #[must_use]
    pub const fn is_unclassified(&self) -> bool {
        matches!(
            self,
            Self::ExternalServiceError | Self::ConfigError | Self::ConfigInvalid | Self::InternalError
        )
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Client-visible detail lines (validation violations)
    pub details: Vec<String>,
    /// Surface `message` as `debug` in the response envelope
    pub expose_debug: bool,
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Internal message, logged and only surfaced in development
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a request ID to the error context
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.context.request_id = Some(request_id.into());
        self
    }

    /// Attach client-visible detail lines
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.context.details = details;
        self
    }

    /// Allow the raw message to appear as `debug` for unclassified errors
    #[must_use]
    pub fn with_debug_exposed(mut self, expose: bool) -> Self {
        self.context.expose_debug = expose;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Build the client-facing envelope
    #[must_use]
    pub fn to_response_body(&self) -> ErrorResponse {
        let debug = (self.context.expose_debug && self.code.is_unclassified())
            .then(|| self.message.clone());
        ErrorResponse {
            success: false,
            error: self.code.public_message().to_owned(),
            details: (!self.context.details.is_empty()).then(|| self.context.details.clone()),
            debug,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Stable user-facing text
    pub error: String,
    /// Every violated field, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    /// Raw cause, development only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response_body())).into_response()
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Validation failure carrying every violation
    pub fn invalid_input(details: Vec<String>) -> Self {
        let message = details.join("; ");
        Self::new(ErrorCode::InvalidInput, message).with_details(details)
    }

    /// Local rate limit exceeded
    pub fn rate_limit_exceeded(limit: u32) -> Self {
        Self::new(
            ErrorCode::RateLimitExceeded,
            format!("Rate limit of {limit} requests exceeded"),
        )
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Upstream credential rejected
    pub fn external_auth_failed(service: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalAuthFailed,
            format!("{service}: {}", message.into()),
        )
    }

    /// Upstream unreachable or timed out
    pub fn external_unavailable(service: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{service}: {}", message.into()),
        )
    }}

/// Conversion from `anyhow::Error` to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, format!("{error:#}"))
    }
}

/// Body JSON that failed to parse
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_input(vec!["Request body must be valid JSON".to_owned()]).with_source(error)
    }
}
