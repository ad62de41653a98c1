// ABOUTME: ShantiSaathi CLI - terminal chat client for the ShantiSaathi API
// ABOUTME: Interactive chat with spoken replies plus health and language queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors
//!
//! Usage:
//! ```bash
//! # Chat in Hindi against a local server
//! shantisaathi-cli chat --lang hi
//!
//! # Chat without speech playback
//! shantisaathi-cli chat --no-voice
//!
//! # Check the server and list languages
//! shantisaathi-cli health
//! shantisaathi-cli languages
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shantisaathi_server::{
    client::ChatClient,
    logging::LoggingConfig,
    voice::{DEFAULT_CAPTURE_COMMAND, DEFAULT_TTS_COMMAND},
};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "shantisaathi-cli",
    about = "ShantiSaathi terminal chat client",
    long_about = "Talk to a ShantiSaathi server from the terminal, with optional spoken replies."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Server base URL
    #[arg(
        long,
        global = true,
        env = "SHANTISAATHI_SERVER_URL",
        default_value = "http://localhost:3000"
    )]
    server: String,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session
    Chat {
        /// Conversation language (code or English name), saved for next time
        #[arg(long)]
        lang: Option<String>,

        /// Do not speak replies
        #[arg(long)]
        no_voice: bool,

        /// Text-to-speech program
        #[arg(long, default_value = DEFAULT_TTS_COMMAND)]
        tts_command: String,

        /// Audio recording program used by /record
        #[arg(long, default_value = DEFAULT_CAPTURE_COMMAND)]
        capture_command: String,
    },

    /// Check server health
    Health,

    /// List supported languages
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose).init()?;
    debug!(server = %cli.server, "ShantiSaathi CLI");

    let client = ChatClient::new(cli.server)?;

    match cli.command {
        Command::Chat {
            lang,
            no_voice,
            tts_command,
            capture_command,
        } => {
            let options = commands::chat::ChatOptions {
                language: lang,
                voice: (!no_voice).then_some(tts_command),
                capture_command,
            };
            commands::chat::run(&client, options).await?;
        }
        Command::Health => commands::info::health(&client).await?,
        Command::Languages => commands::info::languages(&client).await?,
    }

    Ok(())
}
