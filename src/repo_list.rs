//! Repository list input and repository identifiers.

use logcall_core::{Result, ScanError};
use std::fs;
use std::path::Path;

/// Reads one `owner/name` per line, skipping blank lines and `#` comments.
pub fn read_repo_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_repo_list(&text))
}

pub fn parse_repo_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_end_matches('/').to_string())
        .collect()
}

/// `owner/name` from the last two components of a checkout directory,
/// or just the directory name when there is no parent.
pub fn repo_id_from_dir(dir: &Path) -> String {
    let names: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    match names.as_slice() {
        [] => String::new(),
        [name] => name.clone(),
        [.., owner, name] => format!("{}/{}", owner, name),
    }
}
