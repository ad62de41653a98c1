// ABOUTME: CORS middleware configuration for the browser frontend
// ABOUTME: Explicit origin list with credentials, or any origin without them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Configure CORS for the chat API
///
/// Origins come from `ALLOWED_ORIGINS` (or `CORS_ALLOWED_ORIGINS`) plus the
/// configured `FRONTEND_URL`. A `*` entry accepts any origin; credentials are
/// then not allowed, since browsers reject that combination.
///
/// # Examples
///
/// ```bash
/// # Allow all origins (development)
/// export ALLOWED_ORIGINS="*"
///
/// # Allow specific origins (production)
/// export ALLOWED_ORIGINS="https://shantisaathi.app,https://www.shantisaathi.app"
/// ```
pub fn setup_cors(config: &CorsConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-request-id"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    if config.allows_any() {
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin.trim())
                .map_err(|_| warn!(origin = %origin, "Ignoring unparseable CORS origin"))
                .ok()
        })
        .collect();

    if origins.is_empty() {
        // Fallback to any if parsing failed
        base.allow_origin(AllowOrigin::any())
    } else {
        base.allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}
