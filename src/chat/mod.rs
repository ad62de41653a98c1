// ABOUTME: Conversation-turn pipeline between client input and the model call
// ABOUTME: Validation, prompt assembly, response normalization and orchestration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # Chat Pipeline
//!
//! `validate -> compose -> complete -> normalize`, once per request. The
//! server keeps no conversation state; clients resend their history.

/// Response cleanup and fallback
pub mod normalizer;
/// Turn sequencing and upstream call
pub mod orchestrator;
/// System directive and history window
pub mod prompt;
/// Request checks
pub mod validator;

pub use normalizer::{clean, NormalizedReply, ResponseNormalizer};
pub use orchestrator::{ChatOrchestrator, ChatReply, ChatSettings};
pub use prompt::{system_prompt, PromptComposer};
pub use validator::{MessageValidator, ValidatedRequest, ValidationError};
