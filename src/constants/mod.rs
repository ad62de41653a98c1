// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Service identity, chat limits, rate-limit defaults and user-facing message texts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Constants module
//!
//! Application constants grouped by domain. Values that operators may tune are
//! only defaults here; the live values come from [`crate::config::environment::ServerConfig`].

/// Service identity used in logs and health responses
pub mod service {
    /// Service name for structured logging
    pub const SERVICE_NAME: &str = "shantisaathi-server";

    /// Human-readable product name
    pub const PRODUCT_NAME: &str = "ShantiSaathi";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Plain-text banner served at `/`
    pub const ROOT_BANNER: &str = "ShantiSaathi API is running";
}

/// Network defaults
pub mod network {
    /// Default bind host
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default HTTP port
    pub const DEFAULT_PORT: u16 = 3000;

    /// Default frontend URL, always an allowed CORS origin
    pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

    /// Default CORS origins when none are configured
    pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:5174"];

    /// Maximum accepted request body (10 MiB)
    pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
}

/// Chat pipeline limits and model defaults
pub mod chat {
    /// Maximum characters in a user message (after trimming)
    pub const MAX_MESSAGE_CHARS: usize = 2000;

    /// Maximum characters in one history entry
    pub const MAX_HISTORY_CONTENT_CHARS: usize = 8000;

    /// Maximum number of history turns a request may carry
    pub const MAX_HISTORY_TURNS: usize = 20;

    /// Number of trailing history turns forwarded to the model
    pub const HISTORY_WINDOW: usize = 6;

    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Default maximum output tokens
    pub const DEFAULT_MAX_TOKENS: u32 = 1000;

    /// Default model call timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Characters of the user message kept by the echo fallback
    pub const ECHO_PREVIEW_CHARS: usize = 50;

    /// Marker prefixed to the echo fallback
    pub const ECHO_MARKER: &str = "echo: ";

    /// Canned apology used when the model returns nothing usable
    pub const APOLOGY_TEXT: &str =
        "I'm sorry, I couldn't find the right words just now. 🙏\n\nCould you share that with me once more?";

    /// Characters of the user message written to logs
    pub const LOG_PREVIEW_CHARS: usize = 40;
}

/// Per-client rate limit defaults (100 requests per 15 minutes)
pub mod rate_limits {
    /// Requests allowed per window per client
    pub const DEFAULT_MAX_REQUESTS: u32 = 100;

    /// Window length in seconds
    pub const DEFAULT_WINDOW_SECS: u64 = 15 * 60;

    /// Entry count above which stale windows are swept
    pub const CLEANUP_THRESHOLD: usize = 10_000;
}

/// User-facing error texts returned in the `error` field
pub mod messages {
    /// Validation failure
    pub const INVALID_REQUEST: &str = "Invalid request data";

    /// Upstream rejected the credential
    pub const INVALID_API_KEY: &str = "Invalid API key. Please check your LLM provider credentials.";

    /// Upstream quota exhausted
    pub const UPSTREAM_RATE_LIMITED: &str = "Rate limit exceeded. Please wait a moment.";

    /// Local quota exhausted
    pub const LOCAL_RATE_LIMITED: &str = "Too many requests. Please try again later.";

    /// Upstream rejected the request shape or model
    pub const MODEL_ERROR: &str = "Model error. Please try again.";

    /// Upstream timed out or could not be reached
    pub const UPSTREAM_UNAVAILABLE: &str = "AI service is temporarily unavailable. Please try again.";

    /// Anything unclassified
    pub const CHAT_FAILED: &str = "Failed to process chat. Please try again.";

    /// Unmatched route
    pub const ENDPOINT_NOT_FOUND: &str = "Endpoint not found";

    /// Placeholder body for the upload endpoint
    pub const UPLOAD_COMING_SOON: &str = "File upload feature coming soon!";

    /// Client-side placeholder appended when a turn fails
    pub const CONNECTION_ISSUE: &str = "Sorry, there was a connection issue. Please try again.";
}

/// Route paths
pub mod routes {
    /// Health probe
    pub const HEALTH: &str = "/health";
    /// Language catalogue
    pub const LANGUAGES: &str = "/api/languages";
    /// Chat turn
    pub const CHAT: &str = "/api/chat";
    /// Upload placeholder
    pub const UPLOAD: &str = "/api/upload";

    /// Endpoints listed in 404 responses
    pub const AVAILABLE_ENDPOINTS: &[&str] = &[
        "GET /health",
        "GET /api/languages",
        "POST /api/chat",
        "POST /api/upload",
    ];
}
