// ABOUTME: Per-client fixed-window rate limiting for the public API routes
// ABOUTME: Sharded concurrent map keyed by client IP with lazy stale-entry cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # Request Rate Limiting
//!
//! Each client IP gets `max_requests` per fixed window. The window starts at
//! the client's first request and resets once it has fully elapsed. This map
//! is the only state shared across requests.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::constants::rate_limits;

/// Outcome of one rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Request must be rejected
    pub is_limited: bool,
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window after this one
    pub remaining: u32,
    /// Seconds until the window ends
    pub retry_after_seconds: u64,
}

/// Fixed-window limiter with per-IP tracking using a sharded concurrent `HashMap`
#[derive(Clone)]
pub struct RequestRateLimiter {
    /// Per-IP request tracking: IP -> (`request_count`, `window_start`)
    state: Arc<DashMap<IpAddr, (u32, Instant)>>,
    limit: u32,
    window: Duration,
    cleanup_threshold: usize,
}

impl RequestRateLimiter {
    /// Create a limiter from configuration
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(DashMap::new()),
            limit: config.max_requests,
            window: config.window(),
            cleanup_threshold: rate_limits::CLEANUP_THRESHOLD,
        }
    }

    /// Override the map size above which stale windows are swept
    #[must_use]
    pub const fn with_cleanup_threshold(mut self, threshold: usize) -> Self {
        self.cleanup_threshold = threshold;
        self
    }

    /// Requests allowed per window
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of tracked clients
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.state.len()
    }

    /// Count a request from `client_ip` and report whether it is allowed
    #[must_use]
    pub fn check(&self, client_ip: IpAddr) -> RateLimitStatus {
        self.check_at(client_ip, Instant::now())
    }

    /// Check at an explicit instant
    /// Uses `DashMap` entry API for atomic read-modify-write operations
    #[must_use]
    pub fn check_at(&self, client_ip: IpAddr, now: Instant) -> RateLimitStatus {
        let mut entry = self.state.entry(client_ip).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        // Reset window if expired
        if now.saturating_duration_since(*window_start) >= self.window {
            *count = 0;
            *window_start = now;
        }

        let is_limited = *count >= self.limit;
        if !is_limited {
            *count += 1;
        }
        let remaining = self.limit.saturating_sub(*count);
        let started = *window_start;
        drop(entry); // Release the shard lock before cleanup

        if self.state.len() > self.cleanup_threshold {
            self.cleanup_old_entries(now);
        }

        let until_reset = self
            .window
            .saturating_sub(now.saturating_duration_since(started));

        RateLimitStatus {
            is_limited,
            limit: self.limit,
            remaining,
            retry_after_seconds: until_reset.as_secs().max(u64::from(is_limited)),
        }
    }

    /// Remove entries whose window has fully elapsed
    fn cleanup_old_entries(&self, now: Instant) {
        self.state
            .retain(|_ip, (_count, start)| now.saturating_duration_since(*start) < self.window);
    }
}
