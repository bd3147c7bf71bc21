use std::fs::File;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Fail with `AlreadyExists` if the destination is present
    CreateNew,
    /// Overwrite whatever is at the destination
    Replace,
}

/// Copy `from` to `to`, carrying over the modification time and permissions.
///
/// The content is staged in a temporary file inside the destination directory
/// and renamed into place once fully written, so `to` either keeps its previous
/// content or holds the complete copy. The staged file is removed on any error.
pub fn copy_atomic(from: &Path, to: &Path, mode: CopyMode) -> io::Result<u64> {
    let parent = match to.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut source = File::open(from)?;
    let metadata = source.metadata()?;

    let mut staged = NamedTempFile::new_in(parent)?;
    let bytes = io::copy(&mut source, staged.as_file_mut())?;

    // mtime first: a read-only permission set can block later attribute writes
    staged.as_file().set_modified(metadata.modified()?)?;
    staged.as_file().sync_all()?;
    staged.as_file().set_permissions(metadata.permissions())?;

    match mode {
        CopyMode::CreateNew => {
            staged.persist_noclobber(to).map_err(|e| e.error)?;
        }
        CopyMode::Replace => {
            staged.persist(to).map_err(|e| e.error)?;
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_copy_creates_identical_file() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("bgm.mp3");
        let to = temp_dir.path().join("bgm.mp3.bak");
        fs::write(&from, b"ID3 audio").unwrap();

        let bytes = copy_atomic(&from, &to, CopyMode::CreateNew).unwrap();

        assert_eq!(bytes, 9);
        assert_eq!(fs::read(&to).unwrap(), b"ID3 audio");
    }

    #[test]
    fn test_copy_preserves_modification_time() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("bgm.mp3");
        let to = temp_dir.path().join("copy.mp3");
        fs::write(&from, b"audio").unwrap();

        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(&from)
            .unwrap()
            .set_modified(past)
            .unwrap();

        copy_atomic(&from, &to, CopyMode::Replace).unwrap();

        let copied = fs::metadata(&to).unwrap().modified().unwrap();
        assert_eq!(copied, past);
    }

    #[test]
    fn test_create_new_refuses_existing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("new.mp3");
        let to = temp_dir.path().join("existing.bak");
        fs::write(&from, b"new").unwrap();
        fs::write(&to, b"old").unwrap();

        let err = copy_atomic(&from, &to, CopyMode::CreateNew).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&to).unwrap(), b"old");
        // staged temp file must not linger
        assert_eq!(entries(temp_dir.path()), vec!["existing.bak", "new.mp3"]);
    }

    #[test]
    fn test_replace_overwrites_destination() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("new.mp3");
        let to = temp_dir.path().join("target.mp3");
        fs::write(&from, b"new content").unwrap();
        fs::write(&to, b"old").unwrap();

        copy_atomic(&from, &to, CopyMode::Replace).unwrap();

        assert_eq!(fs::read(&to).unwrap(), b"new content");
        assert_eq!(entries(temp_dir.path()), vec!["new.mp3", "target.mp3"]);
    }

    #[test]
    fn test_missing_source_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("missing.mp3");
        let to = temp_dir.path().join("missing.mp3.bak");

        let err = copy_atomic(&from, &to, CopyMode::CreateNew).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(entries(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_missing_destination_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("bgm.mp3");
        fs::write(&from, b"audio").unwrap();
        let to = temp_dir.path().join("no_such_dir").join("bgm.mp3");

        assert!(copy_atomic(&from, &to, CopyMode::Replace).is_err());
        assert!(!to.exists());
    }

    #[test]
    fn test_unreadable_source_keeps_destination() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("folder.mp3");
        let to = temp_dir.path().join("target.mp3");
        fs::create_dir(&from).unwrap();
        fs::write(&to, b"old").unwrap();

        // opening a directory works on unix, reading it does not
        assert!(copy_atomic(&from, &to, CopyMode::Replace).is_err());

        assert_eq!(fs::read(&to).unwrap(), b"old");
        assert_eq!(entries(temp_dir.path()), vec!["folder.mp3", "target.mp3"]);
    }

    #[test]
    fn test_failed_rename_removes_staged_file() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("bgm.mp3");
        let to = temp_dir.path().join("occupied.mp3");
        fs::write(&from, b"audio").unwrap();
        fs::create_dir(&to).unwrap();
        fs::write(to.join("keep.txt"), b"keep").unwrap();

        assert!(copy_atomic(&from, &to, CopyMode::Replace).is_err());

        assert_eq!(fs::read(to.join("keep.txt")).unwrap(), b"keep");
        assert_eq!(entries(temp_dir.path()), vec!["bgm.mp3", "occupied.mp3"]);
    }
}
