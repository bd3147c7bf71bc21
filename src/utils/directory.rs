use crate::models::error::{Result, SwapError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regular files under `dir` whose extension (with leading dot, compared
/// case-insensitively) is in `extensions`, sorted by path.
pub fn get_files_in_path(
    dir: &Path,
    extensions: &[String],
    max_depth: usize,
) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SwapError::DirectoryRead(format!(
            "Not a readable directory: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| SwapError::DirectoryRead(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|wanted| {
        wanted
            .strip_prefix('.')
            .is_some_and(|wanted| wanted.eq_ignore_ascii_case(ext))
    })
}
