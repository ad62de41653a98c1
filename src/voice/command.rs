// ABOUTME: Speech and capture backends driven by external commands
// ABOUTME: Spawns espeak-ng for playback and arecord for capture; speech is killed, recordings are interrupted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::{CaptureBackend, Recording, SpeechEngine, Utterance, VoiceError};

/// Default text-to-speech program
pub const DEFAULT_TTS_COMMAND: &str = "espeak-ng";
/// Default recording program
pub const DEFAULT_CAPTURE_COMMAND: &str = "arecord";

/// How long a recorder may take to finalize its file after an interrupt
const RECORDING_STOP_GRACE: Duration = Duration::from_secs(2);

/// espeak-ng voice name for a speech locale (`hi-IN` -> `hi`, `en-US` -> `en-us`)
#[must_use]
pub fn voice_for_locale(locale: &str) -> String {
    let lower = locale.to_ascii_lowercase();
    match lower.split_once('-') {
        Some(("en", _)) => lower,
        Some((language, _)) => language.to_owned(),
        None => lower,
    }
}

async fn kill_child(child: &mut Child, program: &str) {
    if let Err(e) = child.kill().await {
        warn!(program, error = %e, "Failed to stop child process");
    }
}

/// Ask the child to exit as if Ctrl-C was pressed so it can finish its output
///
/// Returns whether the child exited within `grace`.
#[cfg(unix)]
async fn interrupt_child(child: &mut Child, program: &str, grace: Duration) -> bool {
    let Some(pid) = child.id() else {
        return true;
    };
    let signalled = Command::new("kill")
        .arg("-INT")
        .arg(pid.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .is_ok_and(|status| status.success());
    if !signalled {
        debug!(program, pid, "Could not interrupt child process");
        return false;
    }
    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => {
            debug!(program, %status, "Child process stopped after interrupt");
            true
        }
        Ok(Err(e)) => {
            warn!(program, error = %e, "Failed waiting for child process");
            false
        }
        Err(_) => {
            debug!(program, "Child process ignored interrupt");
            false
        }
    }
}

#[cfg(not(unix))]
async fn interrupt_child(_child: &mut Child, _program: &str, _grace: Duration) -> bool {
    false
}

/// Speaks by running `<program> -v <voice> <text>`
#[derive(Debug, Clone)]
pub struct CommandSpeechEngine {
    program: String,
}

impl Default for CommandSpeechEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TTS_COMMAND)
    }
}

impl CommandSpeechEngine {
    /// Engine using `program`
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

struct ProcessUtterance {
    child: Child,
    program: String,
}

#[async_trait]
impl Utterance for ProcessUtterance {
    async fn cancel(&mut self) {
        if !self.is_finished() {
            kill_child(&mut self.child, &self.program).await;
        }
    }

    fn is_finished(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)) | Err(_))
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    async fn start(&self, text: &str, locale: &str) -> Result<Box<dyn Utterance>, VoiceError> {
        let child = Command::new(&self.program)
            .arg("-v")
            .arg(voice_for_locale(locale))
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| VoiceError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        Ok(Box::new(ProcessUtterance {
            child,
            program: self.program.clone(),
        }))
    }
}

/// Records 16 kHz mono WAV by running `<program> -q -f S16_LE -r 16000 -c 1 <file>`
#[derive(Debug, Clone)]
pub struct CommandCaptureBackend {
    program: String,
}

impl Default for CommandCaptureBackend {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_COMMAND)
    }
}

impl CommandCaptureBackend {
    /// Backend using `program`
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

struct ProcessRecording {
    child: Child,
    program: String,
    output: PathBuf,
}

#[async_trait]
impl Recording for ProcessRecording {
    async fn stop(&mut self) {
        if !matches!(self.child.try_wait(), Ok(None)) {
            return;
        }
        if !interrupt_child(&mut self.child, &self.program, RECORDING_STOP_GRACE).await {
            kill_child(&mut self.child, &self.program).await;
        }
    }

    fn output(&self) -> &Path {
        &self.output
    }
}

#[async_trait]
impl CaptureBackend for CommandCaptureBackend {
    async fn start(&self, output: PathBuf) -> Result<Box<dyn Recording>, VoiceError> {
        let child = Command::new(&self.program)
            .args(["-q", "-f", "S16_LE", "-r", "16000", "-c", "1"])
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| VoiceError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        Ok(Box::new(ProcessRecording {
            child,
            program: self.program.clone(),
            output,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_for_locale() {
        assert_eq!(voice_for_locale("hi-IN"), "hi");
        assert_eq!(voice_for_locale("en-US"), "en-us");
        assert_eq!(voice_for_locale("ur"), "ur");
    }

    #[tokio::test]
    async fn test_missing_program_reports_spawn_error() {
        let engine = CommandSpeechEngine::new("shantisaathi-no-such-tts-binary");
        let err = engine.start("hello", "en-US").await.err().unwrap();
        assert!(matches!(err, VoiceError::Spawn { .. }));
        assert!(err.to_string().contains("shantisaathi-no-such-tts-binary"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancel_kills_running_process() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let mut utterance = ProcessUtterance {
            child,
            program: "sleep".to_owned(),
        };
        assert!(!utterance.is_finished());
        utterance.cancel().await;
        assert!(utterance.is_finished());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recording_stop_lets_recorder_finish_its_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("take.wav");
        let child = Command::new("sh")
            .arg("-c")
            .arg("trap 'echo RIFF > \"$OUT\"; exit 0' INT; while :; do sleep 0.1; done")
            .env("OUT", &output)
            .spawn()
            .unwrap();
        let mut recording = ProcessRecording {
            child,
            program: "sh".to_owned(),
            output: output.clone(),
        };
        // Give the shell time to install its trap
        tokio::time::sleep(Duration::from_millis(300)).await;

        recording.stop().await;

        let status = recording.child.try_wait().unwrap().unwrap();
        assert!(status.success());
        assert_eq!(recording.output(), output.as_path());
        assert_eq!(std::fs::read_to_string(&output).unwrap().trim(), "RIFF");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recording_stop_kills_recorder_that_ignores_interrupt() {
        let child = Command::new("sh")
            .arg("-c")
            .arg("trap '' INT; exec sleep 30")
            .spawn()
            .unwrap();
        let mut recording = ProcessRecording {
            child,
            program: "sh".to_owned(),
            output: PathBuf::from("unused.wav"),
        };
        tokio::time::sleep(Duration::from_millis(300)).await;

        let started = std::time::Instant::now();
        recording.stop().await;

        assert!(recording.child.try_wait().unwrap().is_some());
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
