// ABOUTME: Capture controller owning at most one active recording
// ABOUTME: Starting a new recording stops the previous one first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::path::PathBuf;

use tracing::debug;

use super::{CaptureBackend, Recording, VoiceError};

/// Scoped owner of the single running recording
pub struct CaptureController<B> {
    backend: B,
    active: Option<Box<dyn Recording>>,
}

impl<B: CaptureBackend> CaptureController<B> {
    /// Controller over `backend`
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    /// Start recording into `output`, stopping any recording in progress
    ///
    /// Returns the file of the recording that was stopped, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot start; nothing is recording afterwards
    pub async fn start(&mut self, output: PathBuf) -> Result<Option<PathBuf>, VoiceError> {
        let previous = self.stop().await;
        debug!(output = %output.display(), "Starting capture");
        self.active = Some(self.backend.start(output).await?);
        Ok(previous)
    }

    /// Stop the current recording and return its file
    pub async fn stop(&mut self) -> Option<PathBuf> {
        let mut recording = self.active.take()?;
        recording.stop().await;
        let output = recording.output().to_path_buf();
        debug!(output = %output.display(), "Capture stopped");
        Some(output)
    }

    /// Whether a recording is running
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    struct FakeRecording {
        output: PathBuf,
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Recording for FakeRecording {
        async fn stop(&mut self) {
            self.events
                .lock()
                .unwrap()
                .push(format!("stop {}", self.output.display()));
        }

        fn output(&self) -> &Path {
            &self.output
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl CaptureBackend for FakeBackend {
        async fn start(&self, output: PathBuf) -> Result<Box<dyn Recording>, VoiceError> {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {}", output.display()));
            Ok(Box::new(FakeRecording {
                output,
                events: self.events.clone(),
            }))
        }
    }

    #[tokio::test]
    async fn test_starting_again_stops_previous_recording_first() {
        let backend = FakeBackend::default();
        let events = backend.events.clone();
        let mut capture = CaptureController::new(backend);

        assert_eq!(capture.start(PathBuf::from("a.wav")).await.unwrap(), None);
        let previous = capture.start(PathBuf::from("b.wav")).await.unwrap();
        assert_eq!(previous, Some(PathBuf::from("a.wav")));
        assert!(capture.is_recording());

        assert_eq!(capture.stop().await, Some(PathBuf::from("b.wav")));
        assert!(!capture.is_recording());
        assert_eq!(capture.stop().await, None);

        assert_eq!(
            *events.lock().unwrap(),
            vec!["start a.wav", "stop a.wav", "start b.wav", "stop b.wav"]
        );
    }
}
