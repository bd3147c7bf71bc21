use crate::models::error::{Result, SwapError};
use crate::models::resource_file::ResourceKind;
use crate::service::backup::BackupStore;
use crate::utils::activity_log::ActivityLog;
use crate::utils::copy::{copy_atomic, CopyMode};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ReplaceOutcome {
    pub backup_path: PathBuf,
    pub bytes_written: u64,
}

/// Overwrite the audio resource `target` with the content of `replacement`,
/// taking the one-time backup of `target` first.
///
/// Only whole audio files are replaced; archives are rejected before any
/// backup is taken.
pub fn replace_resource<L: ActivityLog>(
    store: &BackupStore<L>,
    target: &Path,
    replacement: &Path,
    audio_formats: &[String],
) -> Result<ReplaceOutcome> {
    if !target.is_file() {
        return Err(SwapError::NotFound {
            path: target.to_path_buf(),
        });
    }
    if !replacement.is_file() {
        return Err(SwapError::NotFound {
            path: replacement.to_path_buf(),
        });
    }

    match ResourceKind::classify(target, audio_formats) {
        ResourceKind::Audio => {}
        ResourceKind::Archive => {
            return Err(SwapError::UnsupportedResource {
                path: target.to_path_buf(),
                reason: "replacing audio inside game packages is not supported".to_string(),
            })
        }
        ResourceKind::Other => {
            return Err(SwapError::UnsupportedResource {
                path: target.to_path_buf(),
                reason: format!("not an audio file (expected one of {})", audio_formats.join(", ")),
            })
        }
    }

    if ResourceKind::classify(replacement, audio_formats) != ResourceKind::Audio {
        return Err(SwapError::UnsupportedResource {
            path: replacement.to_path_buf(),
            reason: format!(
                "replacement must be an audio file ({})",
                audio_formats.join(", ")
            ),
        });
    }

    let backup_path = store.ensure_backup(target)?;

    let bytes_written =
        copy_atomic(replacement, target, CopyMode::Replace).map_err(|cause| {
            store.log().error(&format!(
                "Failed to replace {}: {}",
                target.display(),
                cause
            ));
            SwapError::io("replace", target, cause)
        })?;

    store.log().info(&format!(
        "Replaced {} with {} ({} bytes)",
        target.display(),
        replacement.display(),
        bytes_written
    ));

    Ok(ReplaceOutcome {
        backup_path,
        bytes_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::activity_log::RecordingLog;
    use std::fs;
    use tempfile::TempDir;

    fn formats() -> Vec<String> {
        vec![".mp3".to_string(), ".wav".to_string(), ".ogg".to_string()]
    }

    #[test]
    fn test_replace_backs_up_then_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("bgm01.mp3");
        let replacement = temp_dir.path().join("my_song.mp3");
        fs::write(&target, b"stock music").unwrap();
        fs::write(&replacement, b"my music").unwrap();
        let store = BackupStore::new(temp_dir.path().join("backups"), RecordingLog::default());

        let outcome = replace_resource(&store, &target, &replacement, &formats()).unwrap();

        assert_eq!(outcome.bytes_written, 8);
        assert_eq!(fs::read(&target).unwrap(), b"my music");
        assert_eq!(fs::read(&outcome.backup_path).unwrap(), b"stock music");
        // the replacement itself is left alone
        assert_eq!(fs::read(&replacement).unwrap(), b"my music");
    }

    #[test]
    fn test_second_replace_keeps_first_backup() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("bgm01.mp3");
        let first = temp_dir.path().join("first.ogg");
        let second = temp_dir.path().join("second.wav");
        fs::write(&target, b"stock").unwrap();
        fs::write(&first, b"first").unwrap();
        fs::write(&second, b"second").unwrap();
        let store = BackupStore::new(temp_dir.path().join("backups"), RecordingLog::default());

        replace_resource(&store, &target, &first, &formats()).unwrap();
        let outcome = replace_resource(&store, &target, &second, &formats()).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"second");
        assert_eq!(fs::read(&outcome.backup_path).unwrap(), b"stock");

        store.restore(&target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"stock");
    }

    #[test]
    fn test_archive_target_is_rejected_without_backup() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("game.zip");
        let replacement = temp_dir.path().join("song.mp3");
        fs::write(&target, [0xAA, 0xBB]).unwrap();
        fs::write(&replacement, b"song").unwrap();
        let store = BackupStore::new(temp_dir.path().join("backups"), RecordingLog::default());

        let result = replace_resource(&store, &target, &replacement, &formats());

        assert!(matches!(result, Err(SwapError::UnsupportedResource { .. })));
        assert!(!store.status(&target).unwrap().has_backup());
        assert_eq!(fs::read(&target).unwrap(), vec![0xAA, 0xBB]);
    }

    #[test]
    fn test_non_audio_replacement_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("bgm01.mp3");
        let replacement = temp_dir.path().join("notes.txt");
        fs::write(&target, b"stock").unwrap();
        fs::write(&replacement, b"text").unwrap();
        let store = BackupStore::new(temp_dir.path().join("backups"), RecordingLog::default());

        let result = replace_resource(&store, &target, &replacement, &formats());

        assert!(matches!(result, Err(SwapError::UnsupportedResource { .. })));
        assert_eq!(fs::read(&target).unwrap(), b"stock");
    }

    #[test]
    fn test_missing_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("bgm01.mp3");
        let replacement = temp_dir.path().join("song.mp3");
        let store = BackupStore::new(temp_dir.path().join("backups"), RecordingLog::default());

        let result = replace_resource(&store, &target, &replacement, &formats());
        assert!(matches!(result, Err(SwapError::NotFound { ref path }) if *path == target));

        fs::write(&target, b"stock").unwrap();
        let result = replace_resource(&store, &target, &replacement, &formats());
        assert!(matches!(result, Err(SwapError::NotFound { ref path }) if *path == replacement));
        assert!(!store.status(&target).unwrap().has_backup());
    }

    #[test]
    fn test_replace_reports_through_store_log() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("bgm01.mp3");
        let replacement = temp_dir.path().join("song.mp3");
        fs::write(&target, b"stock").unwrap();
        fs::write(&replacement, b"song").unwrap();
        let log = RecordingLog::default();
        let store = BackupStore::new(temp_dir.path().join("backups"), &log);

        replace_resource(&store, &target, &replacement, &formats()).unwrap();

        assert!(log.contains("info", "Backed up"));
        assert!(log.contains("info", "Replaced"));
    }

    #[test]
    fn test_blocked_backup_slot_leaves_target_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("bgm01.mp3");
        let replacement = temp_dir.path().join("song.mp3");
        fs::write(&target, b"stock").unwrap();
        fs::write(&replacement, b"song").unwrap();
        fs::create_dir_all(temp_dir.path().join("backups").join("bgm01.mp3.bak")).unwrap();
        let store = BackupStore::new(temp_dir.path().join("backups"), RecordingLog::default());

        let result = replace_resource(&store, &target, &replacement, &formats());

        assert!(matches!(result, Err(SwapError::IoFailure { .. })));
        assert_eq!(fs::read(&target).unwrap(), b"stock");
    }
}
