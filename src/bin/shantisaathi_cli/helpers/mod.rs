// ABOUTME: Helper modules for shantisaathi-cli
// ABOUTME: Terminal output formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

/// Terminal output formatting
pub mod display;
