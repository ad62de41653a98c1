// ABOUTME: Playback controller owning at most one active utterance
// ABOUTME: New speech or muting cancels the current utterance before anything else happens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use tracing::debug;

use super::{SpeechEngine, Utterance, VoiceError};

/// Scoped owner of the single playing utterance
pub struct PlaybackController<E> {
    engine: E,
    current: Option<Box<dyn Utterance>>,
    muted: bool,
}

impl<E: SpeechEngine> PlaybackController<E> {
    /// Controller over `engine`, starting muted or not
    pub fn new(engine: E, muted: bool) -> Self {
        Self {
            engine,
            current: None,
            muted,
        }
    }

    /// Cancel whatever is playing, then speak `text` unless muted
    ///
    /// Returns whether a new utterance was started.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot start; nothing is playing afterwards
    pub async fn speak(&mut self, text: &str, locale: &str) -> Result<bool, VoiceError> {
        self.stop().await;
        if self.muted || text.trim().is_empty() {
            return Ok(false);
        }
        debug!(locale, chars = text.chars().count(), "Starting utterance");
        self.current = Some(self.engine.start(text, locale).await?);
        Ok(true)
    }

    /// Cancel the current utterance, if any
    pub async fn stop(&mut self) {
        if let Some(mut utterance) = self.current.take() {
            utterance.cancel().await;
            debug!("Utterance cancelled");
        }
    }

    /// Mute or unmute; muting silences the current utterance immediately
    pub async fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop().await;
        }
    }

    /// Whether playback is muted
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether an utterance is still playing
    pub fn is_speaking(&mut self) -> bool {
        let finished = self
            .current
            .as_mut()
            .is_some_and(|utterance| utterance.is_finished());
        if finished {
            self.current = None;
        }
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Log {
        events: Vec<String>,
        active: usize,
        max_active: usize,
    }

    struct FakeUtterance {
        text: String,
        log: Arc<Mutex<Log>>,
        finished: bool,
    }

    #[async_trait]
    impl Utterance for FakeUtterance {
        async fn cancel(&mut self) {
            let mut log = self.log.lock().unwrap();
            log.active -= 1;
            log.events.push(format!("cancel {}", self.text));
        }

        fn is_finished(&mut self) -> bool {
            self.finished
        }
    }

    #[derive(Clone, Default)]
    struct FakeEngine {
        log: Arc<Mutex<Log>>,
        finish_immediately: bool,
    }

    #[async_trait]
    impl SpeechEngine for FakeEngine {
        async fn start(&self, text: &str, locale: &str) -> Result<Box<dyn Utterance>, VoiceError> {
            let mut log = self.log.lock().unwrap();
            log.active += 1;
            log.max_active = log.max_active.max(log.active);
            log.events.push(format!("start {text} {locale}"));
            Ok(Box::new(FakeUtterance {
                text: text.to_owned(),
                log: self.log.clone(),
                finished: self.finish_immediately,
            }))
        }
    }

    #[tokio::test]
    async fn test_new_speech_cancels_current_first() {
        let engine = FakeEngine::default();
        let log = engine.log.clone();
        let mut playback = PlaybackController::new(engine, false);

        assert!(playback.speak("one", "hi-IN").await.unwrap());
        assert!(playback.speak("two", "hi-IN").await.unwrap());

        let log = log.lock().unwrap();
        assert_eq!(log.events, vec!["start one hi-IN", "cancel one", "start two hi-IN"]);
        assert_eq!(log.max_active, 1);
    }

    #[tokio::test]
    async fn test_muting_silences_immediately_and_blocks_new_speech() {
        let engine = FakeEngine::default();
        let log = engine.log.clone();
        let mut playback = PlaybackController::new(engine, false);

        playback.speak("hello", "en-US").await.unwrap();
        playback.set_muted(true).await;
        assert!(!playback.is_speaking());
        assert!(!playback.speak("ignored", "en-US").await.unwrap());

        playback.set_muted(false).await;
        assert!(playback.speak("back", "en-US").await.unwrap());
        assert!(playback.is_speaking());

        let log = log.lock().unwrap();
        assert_eq!(
            log.events,
            vec!["start hello en-US", "cancel hello", "start back en-US"]
        );
    }

    #[tokio::test]
    async fn test_finished_utterance_is_released() {
        let engine = FakeEngine {
            finish_immediately: true,
            ..FakeEngine::default()
        };
        let mut playback = PlaybackController::new(engine, false);
        playback.speak("short", "ta-IN").await.unwrap();
        assert!(!playback.is_speaking());
    }

    #[tokio::test]
    async fn test_stop_without_utterance_is_noop() {
        let engine = FakeEngine::default();
        let log = engine.log.clone();
        let mut playback = PlaybackController::new(engine, true);
        playback.stop().await;
        assert!(playback.is_muted());
        assert!(log.lock().unwrap().events.is_empty());
    }
}
