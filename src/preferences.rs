//! # Theme Preference
//!
//! The one piece of client-local state: whether the dashboard renders in dark mode.
//! It is stored as `{ "dark_mode": bool }` in a small JSON file, read once at startup and
//! rewritten on every toggle. Without a saved value the operating system's color scheme
//! decides.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Color scheme reported by the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn is_dark(self) -> bool {
        matches!(self, ColorScheme::Dark)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    dark_mode: bool,
}

/// The persisted light/dark flag.
#[derive(Debug)]
pub struct ThemePreference {
    path: PathBuf,
    dark_mode: bool,
    saved: bool,
}

impl ThemePreference {
    /// Reads the saved flag from `path`, falling back to `os` when nothing usable is there.
    pub fn load(path: impl Into<PathBuf>, os: ColorScheme) -> Self {
        let path = path.into();
        let saved = read_saved(&path);
        if let Some(dark_mode) = saved {
            debug!(dark_mode, path = %path.display(), "Loaded saved theme");
        }
        Self {
            dark_mode: saved.unwrap_or(os.is_dark()),
            saved: saved.is_some(),
            path,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark_mode
    }

    /// Whether the current value came from (or was written to) the preference file.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flips the flag and persists it. Returns the new value.
    pub fn toggle(&mut self) -> Result<bool, PreferenceError> {
        self.set(!self.dark_mode)?;
        Ok(self.dark_mode)
    }

    pub fn set(&mut self, dark_mode: bool) -> Result<(), PreferenceError> {
        let body = serde_json::to_string(&StoredPreference { dark_mode })?;
        std::fs::write(&self.path, body).map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.dark_mode = dark_mode;
        self.saved = true;
        info!(dark_mode, "Theme preference saved");
        Ok(())
    }
}

fn read_saved(path: &Path) -> Option<bool> {
    let body = match std::fs::read_to_string(path) {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable theme preference");
            return None;
        }
    };
    match serde_json::from_str::<StoredPreference>(&body) {
        Ok(stored) => Some(stored.dark_mode),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed theme preference");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unset_follows_os() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        assert!(ThemePreference::load(&path, ColorScheme::Dark).is_dark());
        let light = ThemePreference::load(&path, ColorScheme::Light);
        assert!(!light.is_dark());
        assert!(!light.is_saved());
    }

    #[test]
    fn test_toggle_persists_every_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        let mut pref = ThemePreference::load(&path, ColorScheme::Light);
        assert_eq!(pref.toggle().unwrap(), true);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"dark_mode":true}"#
        );
        assert_eq!(pref.toggle().unwrap(), false);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"dark_mode":false}"#
        );
    }

    #[test]
    fn test_saved_value_beats_os_on_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        let mut pref = ThemePreference::load(&path, ColorScheme::Dark);
        pref.set(false).unwrap();

        let restarted = ThemePreference::load(&path, ColorScheme::Dark);
        assert!(!restarted.is_dark());
        assert!(restarted.is_saved());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let pref = ThemePreference::load(&path, ColorScheme::Dark);
        assert!(pref.is_dark());
        assert!(!pref.is_saved());
    }

    #[test]
    fn test_write_failure_keeps_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("prefs.json");

        let mut pref = ThemePreference::load(&path, ColorScheme::Light);
        assert!(matches!(pref.toggle(), Err(PreferenceError::Write { .. })));
        assert!(!pref.is_dark());
    }
}
