// ABOUTME: Route module organization for the ShantiSaathi HTTP API
// ABOUTME: Assembles domain routers, applies the /api rate limit and answers unmatched paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Route module for the ShantiSaathi server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the chat pipeline.

/// Chat relay route
pub mod chat;
/// Root banner and health check routes
pub mod health;
/// Language catalogue route
pub mod languages;
/// Upload placeholder route
pub mod upload;

use std::sync::Arc;

use axum::{http::Uri, middleware, response::IntoResponse, Json, Router};
use http::StatusCode;
use serde::Serialize;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;
pub use languages::LanguageRoutes;
pub use upload::UploadRoutes;

use crate::constants::{messages, routes};
use crate::middleware::rate_limit_middleware;
use crate::resources::ServerResources;

/// 404 body listing the public endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    /// Always `false`
    pub success: bool,
    /// `Endpoint not found`
    pub error: &'static str,
    /// Requested path
    pub path: String,
    /// Public endpoints
    pub available_endpoints: &'static [&'static str],
}

/// Combine every domain router; `/api` routes are rate limited per client IP
pub fn build_routes(resources: Arc<ServerResources>) -> Router {
    let api = Router::new()
        .merge(ChatRoutes::routes(resources.clone()))
        .merge(LanguageRoutes::routes())
        .merge(UploadRoutes::routes())
        .route_layer(middleware::from_fn_with_state(
            resources.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(HealthRoutes::routes(resources))
        .merge(api)
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            success: false,
            error: messages::ENDPOINT_NOT_FOUND,
            path: uri.path().to_owned(),
            available_endpoints: routes::AVAILABLE_ENDPOINTS,
        }),
    )
}
