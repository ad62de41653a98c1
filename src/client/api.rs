// ABOUTME: HTTP client for the ShantiSaathi chat API
// ABOUTME: Sends chat turns with history and queries health and the language catalogue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::routes;
use crate::llm::ChatMessage;

/// Connection timeout for API calls
const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Overall request timeout, above the server's own model timeout
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Failures talking to the chat API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached or the connection broke
    #[error("Failed to reach {url}: {source}")]
    Transport {
        /// Requested URL
        url: String,
        /// Underlying transport failure
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a failure envelope
    #[error("Server returned {status}: {message}")]
    Server {
        /// HTTP status
        status: StatusCode,
        /// `error` field of the envelope
        message: String,
        /// `details` field of the envelope
        details: Vec<String>,
    },
    /// The response body was not the expected shape
    #[error("Unexpected response from {url}: {source}")]
    Decode {
        /// Requested URL
        url: String,
        /// Body decoding failure
        #[source]
        source: reqwest::Error,
    },
}

/// `POST /api/chat` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatTurnBody<'a> {
    message: &'a str,
    language: &'a str,
    conversation_history: &'a [ChatMessage],
}

/// Successful chat reply
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnReply {
    /// Reply text
    pub message: String,
    /// Display name of the reply language
    pub language: String,
    /// Provider display name
    pub provider: String,
    /// Tokens reported upstream
    #[serde(default)]
    pub tokens_used: Option<u32>,
}

/// `GET /health` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    /// `healthy` when serving
    pub status: String,
    /// Provider display name
    pub ai_provider: String,
    /// Server version
    pub version: String,
}

/// One language from the catalogue
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    /// Code
    pub code: String,
    /// English name
    pub name: String,
    /// Display name
    pub full_name: String,
}

#[derive(Deserialize)]
struct LanguagesBody {
    languages: Vec<LanguageInfo>,
}

#[derive(Deserialize)]
struct FailureBody {
    error: String,
    #[serde(default)]
    details: Vec<String>,
}

/// Chat API client
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    base_url: String,
}

impl ChatClient {
    /// Client for the server at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    /// Server base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send one user turn
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or rejects the turn
    pub async fn send_turn(
        &self,
        message: &str,
        language: &str,
        history: &[ChatMessage],
    ) -> Result<ChatTurnReply, ClientError> {
        let url = self.url(routes::CHAT);
        let body = ChatTurnBody {
            message,
            language,
            conversation_history: history,
        };
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::decode(url, response).await
    }

    /// Query `GET /health`
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or unhealthy
    pub async fn health(&self) -> Result<HealthInfo, ClientError> {
        self.get(routes::HEALTH).await
    }

    /// Query `GET /api/languages`
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable
    pub async fn languages(&self) -> Result<Vec<LanguageInfo>, ClientError> {
        let body: LanguagesBody = self.get(routes::LANGUAGES).await?;
        Ok(body.languages)
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::decode(url, response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        url: String,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|source| ClientError::Decode { url, source });
        }

        let (message, details) = match response.json::<FailureBody>().await {
            Ok(body) => (body.error, body.details),
            Err(_) => (status.canonical_reason().unwrap_or("error").to_owned(), Vec::new()),
        };
        Err(ClientError::Server {
            status,
            message,
            details,
        })
    }
}
