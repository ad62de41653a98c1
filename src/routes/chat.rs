// ABOUTME: Chat route handler relaying one user turn to the model
// ABOUTME: Thin adapter from the HTTP body to the chat orchestrator and back to JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Chat routes
//!
//! The body is taken as raw bytes so that malformed JSON and wrong content
//! types still produce the standard `{success:false, error, details}` envelope
//! instead of the framework's own rejection text.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::chat::ChatReply;
use crate::constants::routes;
use crate::errors::AppError;
use crate::middleware::RequestContext;
use crate::resources::ServerResources;

/// `POST /api/chat` success body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Always `true`
    pub success: bool,
    /// Normalized reply text
    pub message: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    /// Display name of the reply language
    pub language: String,
    /// Display name of the provider
    pub provider: String,
    /// Total tokens reported upstream, zero when the provider sent no usage
    #[serde(default)]
    pub tokens_used: u32,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            success: true,
            message: reply.text,
            timestamp: reply.timestamp.to_rfc3339(),
            language: reply.language.full_name.to_owned(),
            provider: reply.provider,
            tokens_used: reply.tokens_used.unwrap_or(0),
        }
    }
}

/// Chat routes implementation
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(routes::CHAT, post(Self::send_message))
            .with_state(resources)
    }

    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        context: Option<Extension<RequestContext>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let reply = resources.orchestrator.handle_raw(&body).await.map_err(|e| {
            match context {
                Some(Extension(ctx)) => e.with_request_id(ctx.request_id),
                None => e,
            }
        })?;

        Ok(Json(ChatResponse::from(reply)).into_response())
    }
}
