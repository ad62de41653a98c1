// ABOUTME: Builds the ordered message list sent to the model for one chat turn
// ABOUTME: Per-language system directive, trailing history window, then the new user turn
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Prompt assembly.
//!
//! The system directive is rebuilt on every request because the language may
//! change between turns of the same conversation. History beyond the window
//! is dropped, oldest first, and never summarised.

use super::validator::ValidatedRequest;
use crate::constants::chat;
use crate::languages::Language;
use crate::llm::ChatMessage;

/// KIRAN national mental-health helpline (India)
pub const CRISIS_HELPLINE: &str = "KIRAN Mental Health Helpline (1800-599-0019)";

/// System directive for a conversation held in `language`
#[must_use]
pub fn system_prompt(language: &Language) -> String {
    let lang = language.full_name;
    format!(
        "You are ShantiSaathi, a compassionate mental-wellness companion.

LANGUAGE: Respond ONLY in {lang}. Even if the user writes in another language, your entire reply must be in {lang}.

FORMATTING:
- Use emojis naturally to convey warmth 😊
- Put a blank line between sentences so each thought stands on its own
- Keep paragraphs short, two or three sentences at most
- Be warm, gentle and culturally sensitive

APPROACH:
- Listen actively and validate the user's feelings
- Ask open-ended questions that help them reflect
- If the user seems to be in crisis or mentions self-harm, encourage them to contact the {CRISIS_HELPLINE}
- Never give medical advice, diagnoses or medication guidance"
    )
}

/// Assembles the turn list for the model
#[derive(Debug, Clone, Copy)]
pub struct PromptComposer {
    history_window: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(chat::HISTORY_WINDOW)
    }
}

impl PromptComposer {
    /// Composer forwarding at most `history_window` prior turns
    #[must_use]
    pub const fn new(history_window: usize) -> Self {
        Self { history_window }
    }

    /// System turn, trailing history window, new user turn
    #[must_use]
    pub fn compose(&self, request: &ValidatedRequest) -> Vec<ChatMessage> {
        let keep = request.history.len().min(self.history_window);
        let recent = &request.history[request.history.len() - keep..];

        let mut messages = Vec::with_capacity(keep + 2);
        messages.push(ChatMessage::system(system_prompt(request.language)));
        messages.extend_from_slice(recent);
        messages.push(ChatMessage::user(request.message.clone()));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages;
    use crate::llm::MessageRole;

    fn request(history_len: usize, language: &str) -> ValidatedRequest {
        ValidatedRequest {
            message: "I can't sleep".to_owned(),
            language: languages::resolve(Some(language)),
            history: (0..history_len)
                .map(|i| {
                    if i % 2 == 0 {
                        ChatMessage::user(format!("u{i}"))
                    } else {
                        ChatMessage::assistant(format!("a{i}"))
                    }
                })
                .collect(),
        }
    }

    #[test]
    fn test_long_history_keeps_most_recent_window_in_order() {
        let composed = PromptComposer::new(6).compose(&request(15, "en"));

        assert_eq!(composed.len(), 6 + 2);
        assert_eq!(composed[0].role, MessageRole::System);
        let kept: Vec<&str> = composed[1..7].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(kept, vec!["a9", "u10", "a11", "u12", "a13", "u14"]);
        assert_eq!(composed[7], ChatMessage::user("I can't sleep"));
    }

    #[test]
    fn test_short_history_is_forwarded_whole() {
        let composed = PromptComposer::default().compose(&request(2, "en"));
        assert_eq!(composed.len(), 4);
        assert_eq!(composed[1].content, "u0");
        assert_eq!(composed[2].content, "a1");
    }

    #[test]
    fn test_system_prompt_names_language_and_helpline() {
        let composed = PromptComposer::default().compose(&request(0, "ta"));
        let system = &composed[0].content;
        assert!(system.contains("Respond ONLY in தமிழ் (Tamil)"));
        assert!(system.contains("1800-599-0019"));
        assert!(system.contains("Never give medical advice"));
    }

    #[test]
    fn test_system_prompt_follows_language_per_request() {
        let composer = PromptComposer::default();
        let hindi = composer.compose(&request(0, "hi"));
        let english = composer.compose(&request(0, "unknown"));
        assert!(hindi[0].content.contains("हिंदी (Hindi)"));
        assert!(english[0].content.contains("Respond ONLY in English"));
    }
}
