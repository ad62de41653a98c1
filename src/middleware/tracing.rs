// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Generates or propagates request IDs and wraps every HTTP request in a span
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use http::HeaderValue;
use tracing::{info, Instrument, Span};
use uuid::Uuid;

/// Header carrying the request ID in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request context that flows through the entire request lifecycle
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation ID, echoed in the `x-request-id` response header
    pub request_id: String,
}

impl RequestContext {
    /// Create new request context with generated request ID
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: format!("req_{}", Uuid::new_v4().simple()),
        }
    }

    /// Reuse a caller-supplied ID when it is usable
    #[must_use]
    pub fn from_header(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= 128)
            .map_or_else(Self::new, |id| Self {
                request_id: id.to_owned(),
            })
    }

    /// Record context in current tracing span
    pub fn record_in_span(&self) {
        Span::current().record("request_id", self.request_id.as_str());
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a tracing span for HTTP requests
pub fn create_request_span(method: &str, path: &str) -> Span {
    tracing::info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = tracing::field::Empty,
        status_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

/// Attach a request ID, run the request inside its span and log the outcome
pub async fn request_tracing_middleware(mut request: Request, next: Next) -> Response {
    let started = Instant::now();
    let context = RequestContext::from_header(request.headers().get(REQUEST_ID_HEADER));
    let span = create_request_span(request.method().as_str(), request.uri().path());

    async move {
        context.record_in_span();
        request.extensions_mut().insert(context.clone());

        let mut response = next.run(request).await;

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let status = response.status().as_u16();
        let span = Span::current();
        span.record("status_code", status);
        span.record("duration_ms", duration_ms);
        info!(status_code = status, duration_ms, "Request completed");

        if let Ok(value) = HeaderValue::from_str(&context.request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
