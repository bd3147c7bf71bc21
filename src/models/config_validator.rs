use crate::models::config::Config;
use crate::models::error::{Result, SwapError};
use log::{info, warn};
use std::path::Path;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    info!("Validating configuration...");

    validate_log_level(&config.log_level)?;

    validate_audio_formats(&config.audio_formats)?;

    validate_games_dir(&config.games_dir)?;

    if let Some(backup_dir) = &config.backup_dir {
        validate_backup_dir(backup_dir)?;
    }

    validate_window_size(config)?;

    // Installation may simply not be present yet (e.g. a fresh machine)
    if !Path::new(&config.install_path).is_dir() {
        warn!(
            "Configured install_path does not exist: {}. Auto-detection will be used.",
            config.install_path
        );
    }

    info!("Configuration validation passed");
    Ok(())
}

fn validate_log_level(level: &str) -> Result<()> {
    if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        return Err(SwapError::InvalidConfig(format!(
            "log_level '{}' is not one of: {}",
            level,
            LOG_LEVELS.join(", ")
        )));
    }
    Ok(())
}

fn validate_audio_formats(formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(SwapError::InvalidConfig(
            "audio_formats must list at least one extension".to_string(),
        ));
    }

    for (idx, format) in formats.iter().enumerate() {
        if !format.starts_with('.') || format.len() < 2 {
            return Err(SwapError::InvalidConfig(format!(
                "audio_formats entry #{} ('{}') must be an extension with a leading dot, e.g. \".mp3\"",
                idx + 1,
                format
            )));
        }
    }

    Ok(())
}

fn validate_games_dir(games_dir: &str) -> Result<()> {
    if games_dir.trim().is_empty() {
        return Err(SwapError::InvalidConfig(
            "games_dir cannot be empty".to_string(),
        ));
    }

    // Drive-letter and rooted forms are absolute on Windows
    let rooted = games_dir.starts_with(['\\', '/']) || games_dir.chars().nth(1) == Some(':');
    if rooted || Path::new(games_dir).is_absolute() {
        return Err(SwapError::InvalidConfig(format!(
            "games_dir must be relative to the install path: {}",
            games_dir
        )));
    }

    Ok(())
}

fn validate_backup_dir(backup_dir: &str) -> Result<()> {
    if backup_dir.trim().is_empty() {
        return Err(SwapError::InvalidConfig(
            "backup_dir cannot be empty; remove the key to use the default".to_string(),
        ));
    }

    // relative values are resolved against the install base at run time,
    // so only absolute ones can be checked here
    let path = Path::new(backup_dir);
    if path.is_absolute() && path.exists() && !path.is_dir() {
        return Err(SwapError::InvalidConfig(format!(
            "backup_dir exists but is not a directory: {}",
            backup_dir
        )));
    }

    Ok(())
}

fn validate_window_size(config: &Config) -> Result<()> {
    if config.window_width == 0 || config.window_height == 0 {
        return Err(SwapError::InvalidConfig(format!(
            "window size must be greater than 0, got {}x{}",
            config.window_width, config.window_height
        )));
    }
    Ok(())
}
