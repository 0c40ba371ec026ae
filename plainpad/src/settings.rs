//! User settings, stored as JSON next to the recent files list.

use padcore::storage::{self, config_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub font_size: f32,
    pub window_width: f32,
    pub window_height: f32,
    /// Palette file replacing the bundled theme.
    pub palette_path: Option<PathBuf>,
    pub case_sensitive_search: bool,
    pub max_recent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            window_width: 900.0,
            window_height: 640.0,
            palette_path: None,
            case_sensitive_search: false,
            max_recent: 10,
        }
    }
}

impl Settings {
    pub fn path() -> PathBuf {
        config_dir("plainpad").join("settings.json")
    }

    /// Missing or unreadable settings fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match storage::load_json(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load_or_default(&dir.path().join("settings.json")), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "font_size": 18.0, "case_sensitive_search": true }"#).unwrap();
        let settings = Settings::load_or_default(&path);
        assert_eq!(settings.font_size, 18.0);
        assert!(settings.case_sensitive_search);
        assert_eq!(settings.max_recent, 10);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
