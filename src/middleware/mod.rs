// ABOUTME: HTTP middleware for request tracing, CORS and per-client rate limiting
// ABOUTME: Provides request ID generation, span creation and quota enforcement for the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

/// Cross-origin policy
pub mod cors;
/// Per-client quota enforcement
pub mod rate_limiting;
/// Request IDs and request spans
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Rate limiting middleware and utilities
pub use rate_limiting::{client_ip, create_rate_limit_headers, headers, rate_limit_middleware};

// Request tracing and context management
pub use tracing::{create_request_span, request_tracing_middleware, RequestContext};
