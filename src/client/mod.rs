// ABOUTME: Building blocks for the terminal chat client
// ABOUTME: HTTP API client, conversation transcript and persisted preferences
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

/// HTTP client for the chat API
pub mod api;
/// Persisted language and mute settings
pub mod preferences;
/// Conversation transcript and outgoing history
pub mod session;

pub use api::{ChatClient, ChatTurnReply, ClientError, HealthInfo, LanguageInfo};
pub use preferences::{PreferenceStore, Preferences};
pub use session::Transcript;
