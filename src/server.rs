// ABOUTME: HTTP server assembly and lifecycle
// ABOUTME: Layers the router, binds the listener and shuts down gracefully on SIGINT or SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, middleware, Router};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

use crate::constants::{network, routes};
use crate::middleware::{request_tracing_middleware, setup_cors};
use crate::resources::ServerResources;
use crate::routes::build_routes;

/// Build the complete application with its middleware stack
pub fn build_app(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config.cors);

    build_routes(resources)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(network::MAX_BODY_BYTES))
        .layer(cors)
        // Outermost: every request, including CORS preflights, gets an ID and a span
        .layer(middleware::from_fn(request_tracing_middleware))
}

/// Bind and serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr = format!("{}:{}", resources.config.host, resources.config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local_addr = listener.local_addr()?;

    info!("{}", resources.config.summary_log());
    info!(
        address = %local_addr,
        provider = %resources.orchestrator.provider().display_name(),
        "ShantiSaathi server listening"
    );
    for endpoint in routes::AVAILABLE_ENDPOINTS {
        info!("  {endpoint}");
    }

    let app = build_app(resources);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    info!("ShantiSaathi server stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received, draining connections");
}
