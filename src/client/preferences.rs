// ABOUTME: Persisted client preferences for language and mute state
// ABOUTME: Stored as JSON under fixed keys in the user's configuration directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::languages;

/// Directory under the user config dir
const APP_DIR: &str = "shantisaathi";
/// Preferences file name
const FILE_NAME: &str = "preferences.json";

/// Client preferences, read at startup and written on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Selected language code
    #[serde(rename = "shantisaathi.language", default = "default_language_code")]
    pub language: String,
    /// Speech playback muted
    #[serde(rename = "shantisaathi.muted", default)]
    pub muted: bool,
}

fn default_language_code() -> String {
    languages::DEFAULT_LANGUAGE_CODE.to_owned()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: default_language_code(),
            muted: false,
        }
    }
}

/// Preferences bound to a file
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store at the platform config location (`~/.config/shantisaathi/preferences.json` on Linux)
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no config directory
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().context("No configuration directory on this platform")?;
        Ok(Self::at(dir.join(APP_DIR).join(FILE_NAME)))
    }

    /// Store at an explicit path
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults when absent or unreadable
    #[must_use]
    pub fn load(&self) -> Preferences {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<Preferences>(&raw) {
                Ok(mut prefs) => {
                    // Stored codes may predate a registry change
                    prefs.language = languages::resolve(Some(&prefs.language)).code.to_owned();
                    prefs
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Ignoring corrupt preferences file");
                    Preferences::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No preferences file yet");
                Preferences::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read preferences file");
                Preferences::default()
            }
        }
    }

    /// Persist preferences, creating the directory when needed
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(prefs)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}
