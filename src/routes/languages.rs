// ABOUTME: Language catalogue route
// ABOUTME: Lists every supported conversation language in registry order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::constants::routes;
use crate::languages::{Language, LANGUAGES};

/// `GET /api/languages` body
#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    /// Always `true`
    pub success: bool,
    /// Supported languages
    pub languages: &'static [Language],
    /// Number of languages
    pub total: usize,
}

/// Language catalogue routes
pub struct LanguageRoutes;

impl LanguageRoutes {
    /// Create the catalogue route
    pub fn routes<S>() -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Router::new().route(routes::LANGUAGES, get(Self::list))
    }

    async fn list() -> Json<LanguagesResponse> {
        Json(LanguagesResponse {
            success: true,
            languages: LANGUAGES,
            total: LANGUAGES.len(),
        })
    }
}
