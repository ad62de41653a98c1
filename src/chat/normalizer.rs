// ABOUTME: Cleans raw model output into a non-empty display string
// ABOUTME: Strips control characters, repairs sentence spacing and normalizes whitespace per paragraph
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Response normalization.
//!
//! Whitespace is collapsed inside lines only. Blank lines separate paragraphs
//! and survive as exactly one empty line, which keeps the system prompt's
//! "blank line between sentences" formatting intact. `clean` is idempotent.

use crate::config::FallbackMode;
use crate::constants::chat;

/// Sentence terminators after which any letter gets a space
const TERMINATORS: &[char] = &['!', '?', '।', '॥', '؟', '۔'];

/// Normalized reply text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    /// Display text, never empty
    pub text: String,
    /// The model produced nothing usable and the fallback was substituted
    pub fallback_used: bool,
}

/// Turns raw completions into display text
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseNormalizer {
    fallback: FallbackMode,
}

impl ResponseNormalizer {
    /// Normalizer using the given fallback text
    #[must_use]
    pub const fn new(fallback: FallbackMode) -> Self {
        Self { fallback }
    }

    /// Normalize a completion, substituting the fallback when nothing remains
    #[must_use]
    pub fn normalize(&self, raw: Option<&str>, user_message: &str) -> NormalizedReply {
        let cleaned = raw.map(clean).unwrap_or_default();
        if cleaned.is_empty() {
            NormalizedReply {
                text: self.fallback_text(user_message),
                fallback_used: true,
            }
        } else {
            NormalizedReply {
                text: cleaned,
                fallback_used: false,
            }
        }
    }

    /// Fallback text for this normalizer, never empty
    #[must_use]
    pub fn fallback_text(&self, user_message: &str) -> String {
        match self.fallback {
            FallbackMode::Apology => chat::APOLOGY_TEXT.to_owned(),
            FallbackMode::Echo => {
                let preview: String = user_message.chars().take(chat::ECHO_PREVIEW_CHARS).collect();
                clean(&format!("{}{preview}", chat::ECHO_MARKER))
            }
        }
    }
}

/// Clean raw model text
#[must_use]
pub fn clean(raw: &str) -> String {
    let stripped = strip_control(raw);
    let spaced = space_after_terminators(&stripped);
    normalize_paragraphs(&spaced)
}

/// Unify line endings, turn tabs into spaces and drop other control characters
fn strip_control(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    unified
        .chars()
        .filter_map(|c| match c {
            '\n' => Some('\n'),
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Insert the missing space in run-on sentences like `Hi!How are you`
///
/// Works token by token so links keep their query strings intact.
fn space_after_terminators(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut token: Vec<char> = Vec::new();
    for c in text.chars() {
        if c.is_whitespace() {
            push_token(&mut out, &token);
            token.clear();
            out.push(c);
        } else {
            token.push(c);
        }
    }
    push_token(&mut out, &token);
    out
}

fn push_token(out: &mut String, token: &[char]) {
    if is_link(token) {
        out.extend(token);
        return;
    }
    for (i, &c) in token.iter().enumerate() {
        out.push(c);
        if let Some(&next) = token.get(i + 1) {
            if needs_space(&token[..i], c, next) {
                out.push(' ');
            }
        }
    }
}

fn is_link(token: &[char]) -> bool {
    let text: String = token.iter().collect();
    text.contains("://") || text.starts_with("www.")
}

fn needs_space(before: &[char], mark: char, next: char) -> bool {
    if TERMINATORS.contains(&mark) {
        return next.is_alphabetic();
    }
    // `.` is also a decimal point, a domain separator and an initial
    mark == '.'
        && !is_initial(before)
        && (next.is_ascii_uppercase() || (!next.is_ascii() && next.is_alphabetic()))
}

/// A lone letter right before the dot, as in `U.S.` or `e.g.`
fn is_initial(before: &[char]) -> bool {
    match before {
        [.., prev, last] => last.is_alphabetic() && !prev.is_alphabetic(),
        [last] => last.is_alphabetic(),
        [] => false,
    }
}

/// Collapse whitespace inside lines and keep exactly one blank line between paragraphs
fn normalize_paragraphs(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.split('\n') {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(collapsed);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join("\n\n")
}
