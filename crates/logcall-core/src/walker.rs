//! Candidate file enumeration.

use log::warn;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Recursively lists files under `root` whose name ends with `extension`,
/// sorted by path. Unreadable entries are logged and skipped.
pub fn collect_source_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !is_source_file(&entry) {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(extension) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    files
}

/// Regular files, plus symlinks whose target is a regular file. Directory
/// links are never descended into.
fn is_source_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && std::fs::metadata(entry.path())
            .map(|meta| meta.is_file())
            .unwrap_or(false)
}

/// `<repo>/<path relative to root>` with `/` separators, as reported in records.
pub fn record_path(repo: &str, root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if repo.is_empty() {
        parts.join("/")
    } else {
        format!("{}/{}", repo.trim_end_matches('/'), parts.join("/"))
    }
}
