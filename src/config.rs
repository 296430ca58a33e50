//! Configuration loading.
//!
//! Sources, later ones winning: built-in defaults, `config.toml` in the
//! project config directory, then `FLEETUI_`-prefixed environment variables
//! (`FLEETUI_UI__TICK_MS=100` sets `ui.tick_ms`).

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "fleetui.log";
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Event loop poll interval.
    pub tick_ms: u64,
    /// Simulated loading time shown when a page is entered. 0 disables it.
    pub loading_delay_ms: u64,
    /// Confirmation prompts auto-cancel after this many seconds. 0 = never.
    pub confirm_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the session token lives. Defaults to the runtime (or cache) dir.
    pub storage_dir: Option<PathBuf>,
    /// Keep the token in memory only; every launch starts logged out.
    pub ephemeral: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            loading_delay_ms: 600,
            confirm_timeout_secs: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl UiConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn loading_delay(&self) -> Option<Duration> {
        (self.loading_delay_ms > 0).then(|| Duration::from_millis(self.loading_delay_ms))
    }

    pub fn confirm_timeout(&self) -> Option<Duration> {
        (self.confirm_timeout_secs > 0).then(|| Duration::from_secs(self.confirm_timeout_secs))
    }
}

impl Config {
    /// Load configuration, optionally from an explicit file.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLEETUI_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ui.tick_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "ui.tick_ms must be greater than 0".to_string(),
            });
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "logging.level must be one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    self.logging.level
                ),
            });
        }

        Ok(())
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(LOG_FILE_NAME)),
        }
    }

    /// Directory standing in for browser session storage.
    pub fn session_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.session.storage_dir {
            return Ok(dir.clone());
        }
        let dirs = project_dirs()?;
        Ok(dirs
            .runtime_dir()
            .unwrap_or_else(|| dirs.cache_dir())
            .to_path_buf())
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "fleetui", "FleetUI").ok_or_else(|| {
        Error::ConfigValidation {
            message: "could not determine the user's home directory".to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ui.tick_ms, 250);
        assert_eq!(config.ui.loading_delay_ms, 600);
        assert!(config.ui.confirm_timeout().is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.session.ephemeral);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[ui]\nconfirm_timeout_secs = 30\nloading_delay_ms = 0\n\n[session]\nephemeral = true"
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.ui.confirm_timeout(), Some(Duration::from_secs(30)));
        assert!(config.ui.loading_delay().is_none());
        assert!(config.session.ephemeral);
        // untouched values keep their defaults
        assert_eq!(config.ui.tick_ms, 250);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_zero_tick_rejected() {
        let mut config = Config::default();
        config.ui.tick_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tick_ms"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_explicit_paths_win() {
        let mut config = Config::default();
        config.session.storage_dir = Some(PathBuf::from("/tmp/fleetui-session"));
        config.logging.file = Some(PathBuf::from("/tmp/fleetui.log"));
        assert_eq!(
            config.session_dir().unwrap(),
            PathBuf::from("/tmp/fleetui-session")
        );
        assert_eq!(config.log_path().unwrap(), PathBuf::from("/tmp/fleetui.log"));
    }
}
