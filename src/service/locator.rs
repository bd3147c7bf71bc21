use crate::models::config::Config;
use crate::models::error::{Result, SwapError};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const INSTALL_DIR_NAME: &str = "EasiNote5";

/// Well-known install locations, probed in order when the configured
/// path does not exist.
pub const COMMON_INSTALL_PATHS: &[&str] = &[
    "C:\\Program Files\\Seewo\\EasiNote5",
    "C:\\Program Files (x86)\\Seewo\\EasiNote5",
    "D:\\Program Files\\Seewo\\EasiNote5",
    "D:\\Program Files (x86)\\Seewo\\EasiNote5",
];

const AUDIO_SUBPATH: &[&str] = &["Main", ".packages", "Activities", "Audios"];

pub fn find_install_dir(config: &Config) -> Result<PathBuf> {
    let candidates = std::iter::once(config.install_path.as_str())
        .chain(COMMON_INSTALL_PATHS.iter().copied())
        .map(PathBuf::from);
    find_install_dir_in(candidates)
}

fn find_install_dir_in(candidates: impl IntoIterator<Item = PathBuf>) -> Result<PathBuf> {
    for candidate in candidates {
        debug!("Checking install location: {}", candidate.display());
        if candidate.is_dir() {
            info!("Found EasiNote 5 installation: {}", candidate.display());
            return Ok(candidate);
        }
    }
    warn!("EasiNote 5 installation not found");
    Err(SwapError::InstallNotFound)
}

/// Locate `Main/.packages/Activities/Audios`, preferring the newest
/// versioned `EasiNote5*` build directory.
pub fn find_audio_dir(install_dir: &Path) -> Result<PathBuf> {
    let en5_dir = if install_dir.file_name().and_then(|n| n.to_str()) == Some(INSTALL_DIR_NAME) {
        install_dir.to_path_buf()
    } else {
        install_dir.join(INSTALL_DIR_NAME)
    };

    for build_dir in versioned_build_dirs(&en5_dir) {
        let candidate = audio_path_under(&build_dir);
        if candidate.is_dir() {
            info!("Found activity audio directory: {}", candidate.display());
            return Ok(candidate);
        }
        debug!("Audio directory missing in build: {}", candidate.display());
    }

    let fallback = audio_path_under(install_dir);
    if fallback.is_dir() {
        info!("Found activity audio directory: {}", fallback.display());
        return Ok(fallback);
    }

    warn!("Activity audio directory not found under {}", install_dir.display());
    Err(SwapError::ResourceDirNotFound { path: fallback })
}

pub fn find_games_dir(config: &Config, install_dir: &Path) -> Result<PathBuf> {
    let games_dir = install_dir.join(config.games_dir_components());
    if games_dir.is_dir() {
        Ok(games_dir)
    } else {
        Err(SwapError::ResourceDirNotFound { path: games_dir })
    }
}

/// Sub-directories of `en5_dir` named `EasiNote5*`, highest name first
fn versioned_build_dirs(en5_dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(en5_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot list {}: {}", en5_dir.display(), e);
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(INSTALL_DIR_NAME))
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs.reverse();
    dirs
}

fn audio_path_under(root: &Path) -> PathBuf {
    AUDIO_SUBPATH
        .iter()
        .fold(root.to_path_buf(), |path, part| path.join(part))
}
