use crate::models::backup_status::BackupStatus;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};

/// Mini-game packages. Replacing audio inside them is not supported.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".zip", ".xexb"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Audio,
    Archive,
    Other,
}

impl ResourceKind {
    /// Classify a path by its extension, case-insensitively.
    /// `audio_formats` entries carry their leading dot (".mp3").
    pub fn classify(path: &Path, audio_formats: &[String]) -> Self {
        let Some(extension) = dotted_extension(path) else {
            return ResourceKind::Other;
        };

        if audio_formats
            .iter()
            .any(|format| format.eq_ignore_ascii_case(&extension))
        {
            ResourceKind::Audio
        } else if ARCHIVE_EXTENSIONS
            .iter()
            .any(|archive| archive.eq_ignore_ascii_case(&extension))
        {
            ResourceKind::Archive
        } else {
            ResourceKind::Other
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Audio => write!(f, "audio"),
            ResourceKind::Archive => write!(f, "archive"),
            ResourceKind::Other => write!(f, "other"),
        }
    }
}

/// Extension of `path` with a leading dot, e.g. ".mp3"
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
}

#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: ResourceKind,
    pub size: u64,
    pub last_modified: Option<DateTime<Local>>,
    pub backup_status: BackupStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<String> {
        vec![".mp3".to_string(), ".wav".to_string(), ".ogg".to_string()]
    }

    #[test]
    fn test_classify_audio_case_insensitive() {
        assert_eq!(
            ResourceKind::classify(Path::new("bgm/Theme.MP3"), &formats()),
            ResourceKind::Audio
        );
        assert_eq!(
            ResourceKind::classify(Path::new("click.ogg"), &formats()),
            ResourceKind::Audio
        );
    }

    #[test]
    fn test_classify_archives() {
        assert_eq!(
            ResourceKind::classify(Path::new("game.zip"), &formats()),
            ResourceKind::Archive
        );
        assert_eq!(
            ResourceKind::classify(Path::new("quiz.XEXB"), &formats()),
            ResourceKind::Archive
        );
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(
            ResourceKind::classify(Path::new("readme.txt"), &formats()),
            ResourceKind::Other
        );
        assert_eq!(
            ResourceKind::classify(Path::new("no_extension"), &formats()),
            ResourceKind::Other
        );
    }

    #[test]
    fn test_dotted_extension() {
        assert_eq!(dotted_extension(Path::new("a/b.wav")), Some(".wav".to_string()));
        assert_eq!(dotted_extension(Path::new("a/b")), None);
    }
}
