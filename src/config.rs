//! User settings: a JSON file under the config directory, overridable from
//! the environment (a `.env` file is loaded first by `main`).

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{Result, StashError};
use crate::theme::Theme;

pub const THEME_ENV: &str = "STASHVIEW_THEME";
pub const LOG_LEVEL_ENV: &str = "STASHVIEW_LOG";
pub const LOG_FILE_ENV: &str = "STASHVIEW_LOG_FILE";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

pub fn settings_file_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::home_dir().map(|home| home.join(".config")))?;
    Some(base.join("stashview").join("settings.json"))
}

impl Settings {
    /// Settings from the default location with environment overrides.
    ///
    /// The error case still carries usable settings: a broken file falls back
    /// to defaults so startup never fails on it.
    pub fn load() -> (Self, Option<StashError>) {
        let (mut settings, err) = match settings_file_path() {
            Some(path) => match Self::from_file(&path) {
                Ok(s) => (s, None),
                Err(e) => (Self::default(), Some(e)),
            },
            None => (Self::default(), None),
        };
        settings.apply_env(|key| env::var(key).ok());
        (settings, err)
    }

    /// Reads `path`. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(StashError::Config(format!("{}: {}", path.display(), e))),
        };
        serde_json::from_str(&data)
            .map_err(|e| StashError::Config(format!("{}: {}", path.display(), e)))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(theme) = var(THEME_ENV).as_deref().and_then(Theme::from_name) {
            self.theme = theme;
        }
        if let Some(level) = var(LOG_LEVEL_ENV).filter(|s| !s.trim().is_empty()) {
            self.log_level = Some(level);
        }
        if let Some(file) = var(LOG_FILE_ENV).filter(|s| !s.trim().is_empty()) {
            self.log_file = Some(PathBuf::from(file));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let s = Settings::from_file(&dir.path().join("nope.json")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"theme":"terminal"}"#).unwrap();

        let s = Settings::from_file(&path).unwrap();
        assert_eq!(s.theme, Theme::Terminal);
        assert!(s.log_level.is_none());
        assert!(s.log_file.is_none());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ theme: ").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(matches!(err, StashError::Config(_)));
    }

    #[test]
    fn environment_overrides_file() {
        let mut s = Settings {
            theme: Theme::Mocha,
            log_level: Some("info".to_string()),
            log_file: None,
        };
        s.apply_env(|key| match key {
            THEME_ENV => Some("terminal".to_string()),
            LOG_LEVEL_ENV => Some("debug".to_string()),
            LOG_FILE_ENV => Some("/tmp/stashview.log".to_string()),
            _ => None,
        });
        assert_eq!(s.theme, Theme::Terminal);
        assert_eq!(s.log_level.as_deref(), Some("debug"));
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/stashview.log")));
    }

    #[test]
    fn unknown_theme_in_env_is_ignored() {
        let mut s = Settings::default();
        s.apply_env(|key| (key == THEME_ENV).then(|| "neon".to_string()));
        assert_eq!(s.theme, Theme::Mocha);
    }
}
