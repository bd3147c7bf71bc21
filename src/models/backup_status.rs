use std::fmt;

/// Whether a snapshot exists for a tracked resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStatus {
    NoBackup,
    HasBackup,
}

impl BackupStatus {
    pub fn has_backup(&self) -> bool {
        matches!(self, BackupStatus::HasBackup)
    }
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupStatus::NoBackup => write!(f, "no backup"),
            BackupStatus::HasBackup => write!(f, "backed up"),
        }
    }
}

/// Result of comparing a tracked resource against its snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrity {
    NoBackup,
    /// Byte-identical to the snapshot
    Pristine,
    /// Size or digest differs from the snapshot
    Modified,
}

impl fmt::Display for Integrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integrity::NoBackup => write!(f, "no backup"),
            Integrity::Pristine => write!(f, "original"),
            Integrity::Modified => write!(f, "modified"),
        }
    }
}
