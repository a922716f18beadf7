//! Display preference persistence.
//!
//! The dark/light flag is the only state that survives a restart. It lives in
//! `<dir>/theme-storage.json` as `{"state":{"isDark":bool},"version":0}`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Storage key of the persisted display preferences.
pub const STORAGE_KEY: &str = "theme-storage";
const STORAGE_VERSION: u32 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPreferences {
    pub is_dark: bool,
}

impl DisplayPreferences {
    pub fn theme_name(&self) -> &'static str {
        if self.is_dark { "dark" } else { "light" }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Persisted {
    state: DisplayPreferences,
    version: u32,
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to write preferences to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode preferences")]
    Encode(#[from] serde_json::Error),
}

/// File-backed store for [`DisplayPreferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(format!("{STORAGE_KEY}.json"));
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored preferences. A missing, unreadable or malformed file
    /// yields the defaults.
    pub fn load(&self) -> DisplayPreferences {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored preferences");
                return DisplayPreferences::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "preferences unreadable, using defaults");
                return DisplayPreferences::default();
            }
        };

        match serde_json::from_str::<Persisted>(&contents) {
            Ok(persisted) => persisted.state,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "preferences corrupt, using defaults");
                DisplayPreferences::default()
            }
        }
    }

    /// Write the preferences, replacing the file atomically.
    pub fn save(
        &self,
        preferences: DisplayPreferences,
    ) -> Result<(), PreferencesError> {
        let body = serde_json::to_vec(&Persisted {
            state: preferences,
            version: STORAGE_VERSION,
        })?;

        fs::create_dir_all(&self.dir).map_err(|source| self.io_error(source))?;
        let mut file = NamedTempFile::new_in(&self.dir)
            .map_err(|source| self.io_error(source))?;
        file.write_all(&body)
            .map_err(|source| self.io_error(source))?;
        file.persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;

        debug!(path = %self.path.display(), is_dark = preferences.is_dark, "preferences saved");
        Ok(())
    }

    /// Flip the theme, persist it, and return the new value.
    pub fn toggle_theme(&self) -> Result<DisplayPreferences, PreferencesError> {
        let mut preferences = self.load();
        preferences.is_dark = !preferences.is_dark;
        self.save(preferences)?;
        info!(theme = preferences.theme_name(), "theme changed");
        Ok(preferences)
    }

    fn io_error(&self, source: std::io::Error) -> PreferencesError {
        PreferencesError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
