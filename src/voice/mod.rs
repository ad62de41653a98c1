// ABOUTME: Speech playback and audio capture control for the terminal client
// ABOUTME: Engine traits plus controllers that own at most one active utterance or recording
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! # Voice
//!
//! Playback and capture are independent. Each controller owns at most one
//! active handle and cancels it before starting another, so there is never
//! more than one utterance playing or one recording running.

mod capture;
mod command;
mod playback;

pub use capture::CaptureController;
pub use command::{
    voice_for_locale, CommandCaptureBackend, CommandSpeechEngine, DEFAULT_CAPTURE_COMMAND,
    DEFAULT_TTS_COMMAND,
};
pub use playback::PlaybackController;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Failures starting speech or capture
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The external program could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Spawn failure
        #[source]
        source: std::io::Error,
    },
}

/// A running utterance
#[async_trait]
pub trait Utterance: Send {
    /// Silence the utterance immediately
    async fn cancel(&mut self);

    /// Whether playback has ended on its own
    fn is_finished(&mut self) -> bool;
}

/// Text-to-speech backend
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Start speaking `text` with the voice for `locale`
    async fn start(&self, text: &str, locale: &str) -> Result<Box<dyn Utterance>, VoiceError>;
}

/// A running recording
#[async_trait]
pub trait Recording: Send {
    /// Stop recording and release the device
    async fn stop(&mut self);

    /// File the audio is written to
    fn output(&self) -> &Path;
}

/// Audio capture backend
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start recording into `output`
    async fn start(&self, output: PathBuf) -> Result<Box<dyn Recording>, VoiceError>;
}
