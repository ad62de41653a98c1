// ABOUTME: Output formatting helpers for shantisaathi-cli
// ABOUTME: Provides consistent display functions for replies, health and language lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::io::Write;

use shantisaathi_server::{
    client::{HealthInfo, LanguageInfo},
    constants::messages,
    languages::Language,
};

/// Print the input prompt without a newline
pub fn prompt() {
    print!("you> ");
    // A failed flush only delays the prompt
    let _ = std::io::stdout().flush();
}

/// Print an assistant reply, keeping its paragraph breaks
pub fn display_assistant(text: &str) {
    println!();
    for line in text.lines() {
        println!("  {line}");
    }
    println!();
}

/// Print the placeholder shown after a failed turn
pub fn display_connection_issue() {
    println!("\n  {}\n", messages::CONNECTION_ISSUE);
}

/// Print a health report
pub fn display_health(server: &str, info: &HealthInfo) {
    println!("Server:   {server}");
    println!("Status:   {}", info.status);
    println!("Provider: {}", info.ai_provider);
    println!("Version:  {}", info.version);
}

/// Print the catalogue returned by the server
pub fn display_languages(languages: &[LanguageInfo]) {
    for language in languages {
        println!("  {:<4} {:<10} {}", language.code, language.name, language.full_name);
    }
    println!("{} languages", languages.len());
}

/// Print the built-in language table
pub fn display_language_table(languages: &[Language]) {
    for language in languages {
        println!("  {:<4} {:<10} {}", language.code, language.name, language.full_name);
    }
}

/// Print the slash command reference
pub fn display_help() {
    println!("Commands:");
    println!("  /lang <code|name>  switch conversation language");
    println!("  /languages         list supported languages");
    println!("  /mute, /unmute     turn spoken replies off or on");
    println!("  /stop              stop the current spoken reply");
    println!("  /record            start recording a voice note (/record stop to finish)");
    println!("  /quit              leave the chat");
}
