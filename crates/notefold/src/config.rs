//! Settings persistence under the vault's `.notefold/` directory.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use notefold_core::settings::Settings;

pub const SETTINGS_PATH: &str = ".notefold/settings.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error on settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn settings_file(vault_root: &Path) -> PathBuf {
    vault_root.join(SETTINGS_PATH)
}

/// Load settings for a vault. A missing file means defaults; a malformed
/// file is logged and also falls back to defaults rather than blocking the
/// reading view.
pub fn load_settings(vault_root: &Path) -> Settings {
    let path = settings_file(vault_root);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(_) => return Settings::default(),
    };
    match serde_json::from_str(&raw) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed settings file, using defaults");
            Settings::default()
        }
    }
}

pub fn save_settings(vault_root: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let path = settings_file(vault_root);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notefold_core::settings::MatchMode;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(dir.path());
        assert!(settings.match_only_at_start);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.set_match_only_at_start(false);
        save_settings(dir.path(), &settings).unwrap();

        let loaded = load_settings(dir.path());
        assert_eq!(loaded.match_mode(), MatchMode::Anywhere);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".notefold")).unwrap();
        fs::write(dir.path().join(SETTINGS_PATH), "{not json").unwrap();
        let settings = load_settings(dir.path());
        assert!(settings.match_only_at_start);
    }

    #[test]
    fn file_uses_camel_case_key() {
        let dir = tempfile::tempdir().unwrap();
        save_settings(dir.path(), &Settings::default()).unwrap();
        let raw = fs::read_to_string(dir.path().join(SETTINGS_PATH)).unwrap();
        assert!(raw.contains("\"matchOnlyAtStart\": true"));
    }
}
