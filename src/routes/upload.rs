// ABOUTME: File upload placeholder route
// ABOUTME: Accepts and discards the body, always answering with a coming-soon notice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use axum::{body::Bytes, routing::post, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::constants::{messages, routes};

/// `POST /api/upload` body
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always `true`
    pub success: bool,
    /// Placeholder notice
    pub message: &'static str,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Upload routes
pub struct UploadRoutes;

impl UploadRoutes {
    /// Create the upload placeholder route
    pub fn routes<S>() -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Router::new().route(routes::UPLOAD, post(Self::upload))
    }

    async fn upload(body: Bytes) -> Json<UploadResponse> {
        debug!(bytes = body.len(), "Discarding upload body");
        Json(UploadResponse {
            success: true,
            message: messages::UPLOAD_COMING_SOON,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
