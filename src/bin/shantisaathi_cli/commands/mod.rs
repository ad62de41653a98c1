// ABOUTME: Re-exports command modules for shantisaathi-cli
// ABOUTME: Provides the interactive chat session and the server info queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

/// Interactive chat session
pub mod chat;
/// Health and language catalogue queries
pub mod info;
