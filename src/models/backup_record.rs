use std::path::PathBuf;

/// Pairing of a tracked resource with the location of its one-time snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub original_path: PathBuf,
    pub backup_path: PathBuf,
}
