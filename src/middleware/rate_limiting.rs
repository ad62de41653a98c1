// ABOUTME: Rate limiting middleware for the /api routes
// ABOUTME: Resolves the client IP, enforces the per-IP quota and emits RateLimit-* headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, HeaderValue};

use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::rate_limiting::RateLimitStatus;
use crate::resources::ServerResources;

/// Rate limit header names
pub mod headers {
    /// Header name for maximum requests per window
    pub const RATE_LIMIT_LIMIT: &str = "RateLimit-Limit";
    /// Header name for remaining requests in the current window
    pub const RATE_LIMIT_REMAINING: &str = "RateLimit-Remaining";
    /// Header name for seconds until the window resets
    pub const RATE_LIMIT_RESET: &str = "RateLimit-Reset";
    /// Header name for retry-after duration in seconds
    pub const RETRY_AFTER: &str = "Retry-After";
    /// Proxy-supplied client address
    pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
}

/// Create standard rate limit headers from a limiter check
#[must_use]
pub fn create_rate_limit_headers(status: &RateLimitStatus) -> HeaderMap {
    let mut map = HeaderMap::new();

    map.insert(headers::RATE_LIMIT_LIMIT, HeaderValue::from(status.limit));
    map.insert(headers::RATE_LIMIT_REMAINING, HeaderValue::from(status.remaining));
    map.insert(
        headers::RATE_LIMIT_RESET,
        HeaderValue::from(status.retry_after_seconds),
    );

    if status.is_limited {
        map.insert(
            headers::RETRY_AFTER,
            HeaderValue::from(status.retry_after_seconds),
        );
    }

    map
}

/// Client IP: socket peer first, then the first `X-Forwarded-For` hop
#[must_use]
pub fn client_ip(peer: Option<SocketAddr>, request_headers: &HeaderMap) -> IpAddr {
    peer.map(|addr| addr.ip())
        .or_else(|| {
            request_headers
                .get(headers::X_FORWARDED_FOR)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|ip| ip.trim().parse().ok())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Enforce the per-IP quota, counting every request that reaches the layer
pub async fn rate_limit_middleware(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(peer, request.headers());
    let status = resources.rate_limiter.check(ip);

    if status.is_limited {
        AppLogger::log_rate_limited(&ip.to_string(), request.uri().path(), status.limit);
        let mut response = AppError::rate_limit_exceeded(status.limit).into_response();
        response
            .headers_mut()
            .extend(create_rate_limit_headers(&status));
        return response;
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .extend(create_rate_limit_headers(&status));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(is_limited: bool, remaining: u32) -> RateLimitStatus {
        RateLimitStatus {
            is_limited,
            limit: 100,
            remaining,
            retry_after_seconds: 42,
        }
    }

    #[test]
    fn test_headers_for_allowed_request() {
        let headers = create_rate_limit_headers(&status(false, 7));
        assert_eq!(headers[headers::RATE_LIMIT_LIMIT], "100");
        assert_eq!(headers[headers::RATE_LIMIT_REMAINING], "7");
        assert_eq!(headers[headers::RATE_LIMIT_RESET], "42");
        assert!(headers.get(headers::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_retry_after_only_when_limited() {
        let headers = create_rate_limit_headers(&status(true, 0));
        assert_eq!(headers[headers::RETRY_AFTER], "42");
    }

    #[test]
    fn test_client_ip_prefers_peer_address() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(
            headers::X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        let peer: SocketAddr = "192.0.2.1:5555".parse().unwrap();
        assert_eq!(
            client_ip(Some(peer), &request_headers),
            "192.0.2.1".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            client_ip(None, &request_headers),
            "203.0.113.9".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            client_ip(None, &HeaderMap::new()),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }
}
