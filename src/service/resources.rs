use crate::models::error::{Result, SwapError};
use crate::models::resource_file::{ResourceFile, ResourceKind, ARCHIVE_EXTENSIONS};
use crate::service::backup::BackupStore;
use crate::utils::activity_log::ActivityLog;
use crate::utils::directory::get_files_in_path;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Audio and archive files directly inside `dir`
pub fn list_resources<L: ActivityLog>(
    store: &BackupStore<L>,
    dir: &Path,
    audio_formats: &[String],
) -> Result<Vec<ResourceFile>> {
    let mut extensions = audio_formats.to_vec();
    extensions.extend(ARCHIVE_EXTENSIONS.iter().map(|ext| ext.to_string()));

    get_files_in_path(dir, &extensions, 1)?
        .iter()
        .map(|path| describe_resource(store, path, audio_formats))
        .collect()
}

/// Audio files directly inside `dir`; the set batch commands operate on
pub fn list_audio_files(dir: &Path, audio_formats: &[String]) -> Result<Vec<PathBuf>> {
    get_files_in_path(dir, audio_formats, 1)
}

pub fn describe_resource<L: ActivityLog>(
    store: &BackupStore<L>,
    path: &Path,
    audio_formats: &[String],
) -> Result<ResourceFile> {
    let metadata = fs::metadata(path).map_err(|_| SwapError::NotFound {
        path: path.to_path_buf(),
    })?;

    Ok(ResourceFile {
        path: path.to_path_buf(),
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        kind: ResourceKind::classify(path, audio_formats),
        size: metadata.len(),
        last_modified: metadata.modified().ok().map(DateTime::<Local>::from),
        backup_status: store.status(path)?,
    })
}
