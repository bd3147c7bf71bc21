use crate::models::config_validator::validate_config;
use crate::models::error::{Result, SwapError};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;

pub const DEFAULT_INSTALL_PATH: &str = "C:\\Program Files\\Seewo\\EasiNote5";
pub const DEFAULT_BACKUP_DIR_NAME: &str = "backups";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_install_path", alias = "easinote_path")]
    pub install_path: String,
    #[serde(default = "default_games_dir")]
    pub games_dir: String,
    #[serde(default)]
    pub backup_dir: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_audio_formats")]
    pub audio_formats: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Dark,
    Light,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Theme::Auto),
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!(
                "unknown theme '{}', expected one of: auto, dark, light",
                other
            )),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Auto => write!(f, "auto"),
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

fn default_install_path() -> String {
    DEFAULT_INSTALL_PATH.to_string()
}
fn default_games_dir() -> String {
    "resources\\games".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_audio_formats() -> Vec<String> {
    vec![".mp3".to_string(), ".wav".to_string(), ".ogg".to_string()]
}
const fn default_window_width() -> u32 {
    900
}
const fn default_window_height() -> u32 {
    640
}

impl Default for Config {
    fn default() -> Self {
        Config {
            install_path: default_install_path(),
            games_dir: default_games_dir(),
            backup_dir: None,
            log_level: default_log_level(),
            audio_formats: default_audio_formats(),
            theme: Theme::default(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Config {
    /// Backup directory with relative paths anchored at `base`
    /// (normally the directory holding the executable).
    pub fn resolved_backup_dir(&self, base: &Path) -> PathBuf {
        match &self.backup_dir {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                if dir.is_absolute() {
                    dir
                } else {
                    base.join(dir)
                }
            }
            None => base.join(DEFAULT_BACKUP_DIR_NAME),
        }
    }

    /// Games directory split on either separator so the Windows-style
    /// default resolves on every platform.
    pub fn games_dir_components(&self) -> PathBuf {
        self.games_dir
            .split(['\\', '/'])
            .filter(|part| !part.is_empty())
            .collect()
    }
}

pub fn setup_config(config_path: &Path) -> Result<Config> {
    info!("Loading config from: {}", config_path.display());

    if !config_path.exists() {
        info!(
            "Config file {} does not exist, using defaults",
            config_path.display()
        );
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(config_path).map_err(|cause| SwapError::ConfigRead {
        path: config_path.to_path_buf(),
        cause,
    })?;

    let config: Config =
        serde_json::from_str(&config_str).map_err(|cause| SwapError::ConfigParse {
            path: config_path.to_path_buf(),
            cause,
        })?;

    validate_config(&config)?;

    Ok(config)
}

/// Persist `config` as pretty JSON. The file is staged next to its
/// destination and renamed into place.
pub fn save_config(config: &Config, config_path: &Path) -> Result<()> {
    let write_error = |cause: io::Error| SwapError::ConfigWrite {
        path: config_path.to_path_buf(),
        cause,
    };

    let config_json = serde_json::to_string_pretty(config)
        .map_err(|e| write_error(io::Error::other(e)))?;

    let parent = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut staged = NamedTempFile::new_in(parent).map_err(write_error)?;
    staged
        .write_all(config_json.as_bytes())
        .map_err(write_error)?;
    staged.as_file().sync_all().map_err(write_error)?;
    staged
        .persist(config_path)
        .map_err(|e| write_error(e.error))?;

    info!("Configuration saved to {}", config_path.display());
    Ok(())
}
