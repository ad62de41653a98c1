// ABOUTME: Interactive chat session for shantisaathi-cli
// ABOUTME: Reads lines, relays turns to the server, speaks replies and handles slash commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use shantisaathi_server::{
    client::{ChatClient, PreferenceStore, Preferences, Transcript},
    languages::{self, Language},
    voice::{
        CaptureController, CommandCaptureBackend, CommandSpeechEngine, PlaybackController,
        SpeechEngine,
    },
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::helpers::display::{
    display_assistant, display_connection_issue, display_help, display_language_table, prompt,
};

/// Options for one chat session
pub struct ChatOptions {
    /// Language override from the command line
    pub language: Option<String>,
    /// Speech program, `None` when voice is disabled
    pub voice: Option<String>,
    /// Recording program for `/record`
    pub capture_command: String,
}

/// A line typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Message(&'a str),
    SetLanguage(&'a str),
    Mute,
    Unmute,
    StopSpeech,
    Record,
    StopRecording,
    Languages,
    Help,
    Quit,
    Unknown(&'a str),
    Empty,
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line);
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));
    match (name, arg) {
        ("lang", "") => Input::Unknown(line),
        ("lang", code) => Input::SetLanguage(code),
        ("mute", _) => Input::Mute,
        ("unmute", _) => Input::Unmute,
        ("stop", _) => Input::StopSpeech,
        ("record", "stop") => Input::StopRecording,
        ("record", _) => Input::Record,
        ("languages", _) => Input::Languages,
        ("help", _) => Input::Help,
        ("quit" | "exit", _) => Input::Quit,
        _ => Input::Unknown(line),
    }
}

struct Session<'a, E> {
    client: &'a ChatClient,
    store: Option<PreferenceStore>,
    prefs: Preferences,
    transcript: Transcript,
    playback: Option<PlaybackController<E>>,
    capture: CaptureController<CommandCaptureBackend>,
}

impl<E: SpeechEngine> Session<'_, E> {
    fn language(&self) -> &'static Language {
        languages::resolve(Some(&self.prefs.language))
    }

    fn save_prefs(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.prefs) {
                warn!("Could not save preferences: {e:#}");
            }
        }
    }

    async fn send(&mut self, message: &str) {
        let history = self.transcript.history();
        self.transcript.push_user(message);

        match self
            .client
            .send_turn(message, self.language().code, &history)
            .await
        {
            Ok(reply) => {
                display_assistant(&reply.message);
                debug!(tokens = ?reply.tokens_used, provider = %reply.provider, "Reply received");
                self.speak(&reply.message).await;
                self.transcript.push_assistant(reply.message);
            }
            Err(e) => {
                warn!("Chat request failed: {e}");
                self.transcript.push_connection_issue();
                display_connection_issue();
            }
        }
    }

    async fn speak(&mut self, text: &str) {
        let locale = self.language().voice_locale;
        if let Some(playback) = self.playback.as_mut() {
            if let Err(e) = playback.speak(text, locale).await {
                warn!("Speech unavailable: {e}");
            }
        }
    }

    /// Show and speak the greeting for the current language
    async fn greet(&mut self) {
        let welcome = self.language().welcome;
        display_assistant(welcome);
        self.speak(welcome).await;
    }

    async fn stop_speech(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            println!("Voice is off.");
            return;
        };
        if playback.is_speaking() {
            playback.stop().await;
        } else {
            println!("Nothing is playing.");
        }
    }

    async fn set_muted(&mut self, muted: bool) {
        self.prefs.muted = muted;
        self.save_prefs();
        if let Some(playback) = self.playback.as_mut() {
            playback.set_muted(muted).await;
        }
        println!("{}", if muted { "Voice muted." } else { "Voice on." });
    }

    /// Switching language silences the old voice and starts a fresh conversation
    async fn set_language(&mut self, value: &str) {
        let Some(language) = languages::find(value) else {
            println!("Unknown language '{value}'. Type /languages to see the options.");
            return;
        };
        if let Some(playback) = self.playback.as_mut() {
            playback.stop().await;
        }
        self.prefs.language = language.code.to_owned();
        self.save_prefs();
        self.transcript.clear();
        println!("Language set to {}.", language.full_name);
        self.greet().await;
    }

    async fn start_recording(&mut self) {
        let output = recording_path();
        match self.capture.start(output.clone()).await {
            Ok(previous) => {
                if let Some(previous) = previous {
                    println!("Saved recording to {}", previous.display());
                }
                println!("Recording to {} (type /record stop to finish)", output.display());
            }
            Err(e) => println!("Cannot record: {e}"),
        }
    }

    async fn shutdown(&mut self) {
        if let Some(playback) = self.playback.as_mut() {
            playback.stop().await;
        }
        if let Some(saved) = self.capture.stop().await {
            println!("Saved recording to {}", saved.display());
        }
    }
}

fn recording_path() -> PathBuf {
    let dir = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
    dir.join("shantisaathi")
        .join(format!("recording-{}.wav", Utc::now().format("%Y%m%d-%H%M%S")))
}

/// Run the interactive chat loop until `/quit` or end of input
pub async fn run(client: &ChatClient, options: ChatOptions) -> Result<()> {
    let store = PreferenceStore::default_location()
        .inspect_err(|e| warn!("Preferences will not be saved: {e:#}"))
        .ok();
    let mut prefs = store.as_ref().map(PreferenceStore::load).unwrap_or_default();

    let playback: Option<PlaybackController<CommandSpeechEngine>> = options
        .voice
        .map(|program| PlaybackController::new(CommandSpeechEngine::new(program), prefs.muted));
    let capture = CaptureController::new(CommandCaptureBackend::new(options.capture_command));

    if let Some(value) = options.language.as_deref() {
        match languages::find(value) {
            Some(language) => prefs.language = language.code.to_owned(),
            None => warn!("Unknown language '{value}', keeping {}", prefs.language),
        }
    }

    let mut session = Session {
        client,
        store,
        prefs,
        transcript: Transcript::default(),
        playback,
        capture,
    };
    session.save_prefs();

    if let Some(dir) = recording_path().parent() {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            debug!("Cannot create recording directory: {e}");
        }
    }

    println!(
        "ShantiSaathi ({}) - talking in {}. Type /help for commands.",
        client.base_url(),
        session.language().full_name
    );
    session.greet().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Message(message) => session.send(message).await,
            Input::SetLanguage(value) => session.set_language(value).await,
            Input::Mute => session.set_muted(true).await,
            Input::Unmute => session.set_muted(false).await,
            Input::StopSpeech => session.stop_speech().await,
            Input::Record => session.start_recording().await,
            Input::StopRecording => match session.capture.stop().await {
                Some(saved) => println!("Saved recording to {}", saved.display()),
                None => println!("Not recording."),
            },
            Input::Languages => display_language_table(languages::LANGUAGES),
            Input::Help => display_help(),
            Input::Quit => break,
            Input::Unknown(text) => println!("Unknown command '{text}'. Type /help for commands."),
        }
    }

    session.shutdown().await;
    Ok(())
}
