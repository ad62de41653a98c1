// ABOUTME: Chat request validation that runs before any upstream call
// ABOUTME: Checks message, language and history fields and reports every violation at once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::chat;
use crate::errors::AppError;
use crate::languages::{self, Language};
use crate::llm::{ChatMessage, MessageRole};

/// Every violated field of a rejected request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid chat request: {}", .0.join("; "))]
pub struct ValidationError(pub Vec<String>);

impl ValidationError {
    /// Violation messages in field order
    #[must_use]
    pub fn violations(&self) -> &[String] {
        &self.0
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_input(error.0)
    }
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Trimmed user message
    pub message: String,
    /// Resolved language (English when unknown)
    pub language: &'static Language,
    /// Prior turns as supplied by the client
    pub history: Vec<ChatMessage>,
}

/// Limits applied to incoming chat requests
#[derive(Debug, Clone, Copy)]
pub struct MessageValidator {
    max_message_chars: usize,
    max_history: usize,
    max_history_content_chars: usize,
}

impl Default for MessageValidator {
    fn default() -> Self {
        Self::new(chat::MAX_HISTORY_TURNS)
    }
}

impl MessageValidator {
    /// Validator accepting at most `max_history` prior turns
    #[must_use]
    pub const fn new(max_history: usize) -> Self {
        Self {
            max_message_chars: chat::MAX_MESSAGE_CHARS,
            max_history,
            max_history_content_chars: chat::MAX_HISTORY_CONTENT_CHARS,
        }
    }

    /// Validate a decoded request body
    ///
    /// # Errors
    ///
    /// Returns every violated field when the body is not acceptable
    pub fn validate(&self, body: &Value) -> Result<ValidatedRequest, ValidationError> {
        let Some(object) = body.as_object() else {
            return Err(ValidationError(vec![
                "Request body must be a JSON object".to_owned(),
            ]));
        };

        let mut violations = Vec::new();
        let message = self.check_message(object, &mut violations);
        let language = Self::check_language(object, &mut violations);
        let history = self.check_history(object, &mut violations);

        match message {
            Some(message) if violations.is_empty() => Ok(ValidatedRequest {
                message,
                language,
                history,
            }),
            _ => Err(ValidationError(violations)),
        }
    }

    fn check_message(
        &self,
        object: &Map<String, Value>,
        violations: &mut Vec<String>,
    ) -> Option<String> {
        match object.get("message") {
            None | Some(Value::Null) => {
                violations.push("Message cannot be empty".to_owned());
                None
            }
            Some(Value::String(raw)) => {
                let trimmed = raw.trim();
                let chars = trimmed.chars().count();
                if chars == 0 {
                    violations.push("Message cannot be empty".to_owned());
                    None
                } else if chars > self.max_message_chars {
                    violations.push("Message too long".to_owned());
                    None
                } else {
                    Some(trimmed.to_owned())
                }
            }
            Some(_) => {
                violations.push("Message must be a string".to_owned());
                None
            }
        }
    }

    fn check_language(object: &Map<String, Value>, violations: &mut Vec<String>) -> &'static Language {
        match object.get("language") {
            None | Some(Value::Null) => languages::default_language(),
            Some(Value::String(code)) => languages::resolve(Some(code)),
            Some(_) => {
                violations.push("Language must be a string".to_owned());
                languages::default_language()
            }
        }
    }

    fn check_history(
        &self,
        object: &Map<String, Value>,
        violations: &mut Vec<String>,
    ) -> Vec<ChatMessage> {
        let entries = match object.get("conversationHistory") {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                violations.push("Conversation history must be an array".to_owned());
                return Vec::new();
            }
        };

        if entries.len() > self.max_history {
            violations.push("Conversation history too long".to_owned());
        }

        entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| self.check_turn(i, entry, violations))
            .collect()
    }

    fn check_turn(&self, index: usize, entry: &Value, violations: &mut Vec<String>) -> Option<ChatMessage> {
        let Some(turn) = entry.as_object() else {
            violations.push(format!("Conversation history entry {index} must be an object"));
            return None;
        };

        let role = turn.get("role").and_then(Value::as_str).and_then(MessageRole::parse);
        if role.is_none() {
            violations.push(format!("Conversation history entry {index} has invalid role"));
        }

        let content = match turn.get("content") {
            Some(Value::String(text)) if text.trim().is_empty() => {
                violations.push(format!(
                    "Conversation history entry {index} content cannot be empty"
                ));
                None
            }
            Some(Value::String(text)) if text.chars().count() > self.max_history_content_chars => {
                violations.push(format!("Conversation history entry {index} content too long"));
                None
            }
            Some(Value::String(text)) => Some(text.clone()),
            _ => {
                violations.push(format!(
                    "Conversation history entry {index} content must be a string"
                ));
                None
            }
        };

        Some(ChatMessage::new(role?, content?))
    }
}
