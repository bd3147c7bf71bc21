use crate::models::backup_record::BackupRecord;
use crate::models::backup_status::{BackupStatus, Integrity};
use crate::models::error::{Result, SwapError};
use crate::service::hash::hash_file;
use crate::utils::activity_log::ActivityLog;
use crate::utils::copy::{copy_atomic, CopyMode};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const BACKUP_SUFFIX: &str = ".bak";

/// One-time snapshots of tracked resources, kept as `<file_name>.bak`
/// in a flat backup directory.
///
/// A snapshot is written once and never refreshed, so it always holds the
/// first observed state of the resource. Callers must serialize calls for the
/// same resource; the store holds no locks.
pub struct BackupStore<L: ActivityLog> {
    backup_dir: PathBuf,
    log: L,
}

impl<L: ActivityLog> BackupStore<L> {
    pub fn new(backup_dir: impl Into<PathBuf>, log: L) -> Self {
        BackupStore {
            backup_dir: backup_dir.into(),
            log,
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn backup_path_for(&self, original_path: &Path) -> Result<PathBuf> {
        let file_name = original_path
            .file_name()
            .ok_or_else(|| SwapError::NotFound {
                path: original_path.to_path_buf(),
            })?;
        let mut backup_name = file_name.to_os_string();
        backup_name.push(BACKUP_SUFFIX);
        Ok(self.backup_dir.join(backup_name))
    }

    pub fn record_for(&self, original_path: &Path) -> Result<BackupRecord> {
        Ok(BackupRecord {
            original_path: original_path.to_path_buf(),
            backup_path: self.backup_path_for(original_path)?,
        })
    }

    pub fn status(&self, original_path: &Path) -> Result<BackupStatus> {
        if self.backup_path_for(original_path)?.is_file() {
            Ok(BackupStatus::HasBackup)
        } else {
            Ok(BackupStatus::NoBackup)
        }
    }

    /// Snapshot `original_path` unless a snapshot already exists.
    pub fn ensure_backup(&self, original_path: &Path) -> Result<PathBuf> {
        if !original_path.is_file() {
            self.log.error(&format!(
                "Cannot back up missing file: {}",
                original_path.display()
            ));
            return Err(SwapError::NotFound {
                path: original_path.to_path_buf(),
            });
        }

        let backup_path = self.backup_path_for(original_path)?;
        if self.existing_backup(&backup_path)? {
            self.log
                .info(&format!("Backup already exists: {}", backup_path.display()));
            return Ok(backup_path);
        }

        fs::create_dir_all(&self.backup_dir).map_err(|cause| {
            self.log.error(&format!(
                "Failed to create backup directory {}: {}",
                self.backup_dir.display(),
                cause
            ));
            SwapError::io("create backup directory", &self.backup_dir, cause)
        })?;

        match copy_atomic(original_path, &backup_path, CopyMode::CreateNew) {
            Ok(bytes) => {
                self.log.info(&format!(
                    "Backed up {} -> {} ({} bytes)",
                    original_path.display(),
                    backup_path.display(),
                    bytes
                ));
                Ok(backup_path)
            }
            // Another writer got there first; its snapshot is the earlier state
            Err(cause) if cause.kind() == io::ErrorKind::AlreadyExists => {
                if !self.existing_backup(&backup_path)? {
                    return Err(SwapError::io("back up", &backup_path, cause));
                }
                self.log
                    .info(&format!("Backup already exists: {}", backup_path.display()));
                Ok(backup_path)
            }
            Err(cause) => {
                self.log.error(&format!(
                    "Failed to back up {}: {}",
                    original_path.display(),
                    cause
                ));
                Err(SwapError::io("back up", original_path, cause))
            }
        }
    }

    /// `true` when a regular file holds the snapshot. Anything else occupying
    /// the slot is an error: it can neither be restored from nor replaced.
    fn existing_backup(&self, backup_path: &Path) -> Result<bool> {
        match fs::symlink_metadata(backup_path) {
            Ok(_) if backup_path.is_file() => Ok(true),
            Ok(_) => {
                self.log.error(&format!(
                    "Backup slot is occupied by something other than a file: {}",
                    backup_path.display()
                ));
                Err(SwapError::io(
                    "back up",
                    backup_path,
                    io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "backup path exists but is not a regular file",
                    ),
                ))
            }
            Err(_) => Ok(false),
        }
    }

    pub(crate) fn log(&self) -> &L {
        &self.log
    }

    /// Put the snapshot content back at `original_path`. The snapshot is kept.
    pub fn restore(&self, original_path: &Path) -> Result<()> {
        let backup_path = self.backup_path_for(original_path)?;
        if !backup_path.is_file() {
            self.log
                .error(&format!("No backup found: {}", backup_path.display()));
            return Err(SwapError::BackupMissing {
                original: original_path.to_path_buf(),
                backup: backup_path,
            });
        }

        copy_atomic(&backup_path, original_path, CopyMode::Replace).map_err(|cause| {
            self.log.error(&format!(
                "Failed to restore {}: {}",
                original_path.display(),
                cause
            ));
            SwapError::io("restore", original_path, cause)
        })?;

        self.log
            .info(&format!("Restored {}", original_path.display()));
        Ok(())
    }

    /// Compare the current content of `original_path` with its snapshot
    pub fn verify(&self, original_path: &Path) -> Result<Integrity> {
        if !original_path.is_file() {
            return Err(SwapError::NotFound {
                path: original_path.to_path_buf(),
            });
        }

        let backup_path = self.backup_path_for(original_path)?;
        if !backup_path.is_file() {
            return Ok(Integrity::NoBackup);
        }

        let original_len = file_len(original_path)?;
        let backup_len = file_len(&backup_path)?;
        if original_len != backup_len {
            return Ok(Integrity::Modified);
        }

        if hash_file(original_path)? == hash_file(&backup_path)? {
            Ok(Integrity::Pristine)
        } else {
            Ok(Integrity::Modified)
        }
    }
}

fn file_len(path: &Path) -> Result<u64> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|cause| SwapError::io("read metadata of", path, cause))
}
