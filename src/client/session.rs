// ABOUTME: Client-side conversation transcript
// ABOUTME: Records turns for display and derives the bounded history sent with each request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use crate::constants::{chat, messages};
use crate::llm::{ChatMessage, MessageRole};

/// One line of the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
struct TranscriptEntry {
    role: MessageRole,
    text: String,
    /// Failed turn or its placeholder, never sent back to the server
    is_error: bool,
}

/// Conversation as seen by the client
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    max_history: usize,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(chat::MAX_HISTORY_TURNS)
    }
}

impl Transcript {
    /// Transcript sending at most `max_history` prior turns per request
    #[must_use]
    pub const fn new(max_history: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_history,
        }
    }

    fn push(&mut self, role: MessageRole, text: impl Into<String>, is_error: bool) {
        self.entries.push(TranscriptEntry {
            role,
            text: text.into(),
            is_error,
        });
    }

    /// Record the user's message
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(MessageRole::User, text, false);
    }

    /// Record the assistant's reply
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(MessageRole::Assistant, text, false);
    }

    /// Record the connection-issue placeholder after a failed turn
    ///
    /// The user message that failed is withdrawn from history as well, so a
    /// turn the server rejected is never replayed.
    pub fn push_connection_issue(&mut self) {
        if let Some(last) = self
            .entries
            .last_mut()
            .filter(|entry| entry.role == MessageRole::User)
        {
            last.is_error = true;
        }
        self.push(MessageRole::Assistant, messages::CONNECTION_ISSUE, true);
    }

    /// Most recent real turns, oldest first, excluding failed turns
    #[must_use]
    pub fn history(&self) -> Vec<ChatMessage> {
        let mut turns: Vec<ChatMessage> = self
            .entries
            .iter()
            .rev()
            .filter(|entry| !entry.is_error)
            .take(self.max_history)
            .map(|entry| ChatMessage::new(entry.role, entry.text.clone()))
            .collect();
        turns.reverse();
        turns
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
