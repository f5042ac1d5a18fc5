//! Scan configuration, loadable from a JSON file.

use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File-name suffix of the sources to scan
    pub extension: String,
    /// Receivers that are never loggers
    pub denylist: Vec<String>,
    /// Minimum significant argument length for a call to be kept
    pub min_content_len: usize,
    /// Worker pool size; 0 uses the available parallelism
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: ".py".to_string(),
            denylist: vec!["console".to_string(), "math".to_string(), "np".to_string()],
            min_content_len: 2,
            workers: 0,
        }
    }
}

impl ScanConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| ScanError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pool size to build, resolving 0 to the machine's parallelism
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}
