use crate::consts;
use crate::game::Rules;
use ratatui::layout::Size;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Milliseconds to wait after a game ends before starting a new one
    pub(crate) restart_delay: u64,

    /// Size of the drawing surface, from which the board size is derived
    pub(crate) canvas: CanvasConfig,

    /// Snake speed & speed-up settings
    pub(crate) rules: Rules,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    pub(crate) fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            restart_delay: consts::RESTART_DELAY_MS,
            canvas: CanvasConfig::default(),
            rules: Rules::default(),
        }
    }
}

/// Pixel dimensions of the drawing surface
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct CanvasConfig {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl CanvasConfig {
    pub(crate) fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> CanvasConfig {
        CanvasConfig {
            width: consts::DEFAULT_CANVAS_SIZE.width,
            height: consts::DEFAULT_CANVAS_SIZE.height,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
