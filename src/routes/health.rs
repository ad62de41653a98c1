// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Plain-text root banner and a JSON health report naming the active provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Health check routes for service monitoring
//!
//! Neither endpoint touches the upstream provider, so they stay cheap enough
//! for load balancer probes.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::{routes, service};
use crate::resources::ServerResources;

/// `GET /health` body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `true`
    pub success: bool,
    /// Always `healthy` while the process serves requests
    pub status: String,
    /// Display name of the configured provider
    pub ai_provider: String,
    /// Server version
    pub version: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::root))
            .route(routes::HEALTH, get(Self::health))
            .with_state(resources)
    }

    async fn root() -> &'static str {
        service::ROOT_BANNER
    }

    async fn health(State(resources): State<Arc<ServerResources>>) -> Json<HealthResponse> {
        Json(HealthResponse {
            success: true,
            status: "healthy".to_owned(),
            ai_provider: resources.orchestrator.provider().display_name().to_owned(),
            version: service::SERVER_VERSION.to_owned(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
