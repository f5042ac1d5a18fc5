//! Repository-level driver: enumerate files and scan them on a worker pool.

use crate::cancellation::CancellationToken;
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::filter::AcceptanceFilter;
use crate::scanner::{scan_file, FileScan};
use crate::types::{FileContext, LoggerCall};
use crate::walker::{collect_source_files, record_path};
use log::{debug, error, warn};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::Path;
use std::time::{Duration, Instant};

/// Aggregated result of scanning one repository
#[derive(Debug, Clone, Default)]
pub struct RepoScan {
    pub repo: String,
    /// Accepted calls, grouped by file in path order
    pub records: Vec<LoggerCall>,
    pub generic_log_calls: usize,
    pub files_found: usize,
    pub files_scanned: usize,
    /// Files not dispatched because the scan was cancelled
    pub files_cancelled: usize,
    /// Files that could not be opened
    pub files_failed: usize,
    /// Files whose scan stopped at an undecodable line
    pub decode_failures: usize,
    pub rejected: usize,
    pub unterminated: usize,
    pub duration: Duration,
}

enum FileOutcome {
    Scanned(FileScan),
    Failed,
    Cancelled,
}

/// Scans repositories with a fixed-size worker pool.
pub struct Driver {
    config: ScanConfig,
    filter: AcceptanceFilter,
    pool: ThreadPool,
    cancel: CancellationToken,
}

impl Driver {
    pub fn new(config: ScanConfig, cancel: CancellationToken) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.effective_workers())
            .thread_name(|i| format!("logcall-worker-{}", i))
            .build()?;
        Ok(Self {
            filter: AcceptanceFilter::from_config(&config),
            config,
            pool,
            cancel,
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Scans every candidate file under `root`, reporting records as belonging to `repo`.
    pub fn scan_repo(&self, repo: &str, root: &Path) -> Result<RepoScan> {
        if !root.is_dir() {
            return Err(ScanError::MissingRoot(root.to_path_buf()));
        }
        let start = Instant::now();
        let files = collect_source_files(root, &self.config.extension);
        debug!("{} | {} candidate files", repo, files.len());

        let outcomes: Vec<FileOutcome> = self.pool.install(|| {
            files
                .par_iter()
                .map(|file| self.scan_one(repo, root, file))
                .collect()
        });

        let mut result = RepoScan {
            repo: repo.to_string(),
            files_found: files.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                FileOutcome::Scanned(scan) => {
                    result.files_scanned += 1;
                    result.generic_log_calls += scan.generic_log_calls;
                    result.rejected += scan.rejected;
                    if scan.unterminated {
                        result.unterminated += 1;
                    }
                    if scan.decode_error.is_some() {
                        result.decode_failures += 1;
                    }
                    result.records.extend(scan.records);
                }
                FileOutcome::Failed => result.files_failed += 1,
                FileOutcome::Cancelled => result.files_cancelled += 1,
            }
        }
        result.duration = start.elapsed();

        if result.files_cancelled > 0 {
            warn!(
                "{} | cancelled before scanning {} of {} files",
                repo, result.files_cancelled, result.files_found
            );
        }
        Ok(result)
    }

    fn scan_one(&self, repo: &str, root: &Path, file: &Path) -> FileOutcome {
        if self.cancel.is_cancelled() {
            return FileOutcome::Cancelled;
        }
        let ctx = FileContext::new(repo, record_path(repo, root, file));
        match scan_file(file, &ctx, &self.filter) {
            Ok(scan) => FileOutcome::Scanned(scan),
            Err(e) => {
                error!("{} | {}", repo, e);
                FileOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn write_repo(root: &Path) {
        fs::create_dir_all(root.join("app/util")).unwrap();
        fs::write(
            root.join("app/main.py"),
            "import logging\nlog = logging.getLogger(__name__)\nlog.info(\"start\")\nlog.log(logging.ERROR, \"bad\")\n",
        )
        .unwrap();
        fs::write(
            root.join("app/util/io.py"),
            "def read(p):\n    logger.debug(\n        \"reading %s\",\n        p)\n    console.error(\"nope\")\n",
        )
        .unwrap();
        fs::write(root.join("app/util/blob.py"), b"log.warning(\"ok\")\n\xff\n").unwrap();
        fs::write(root.join("README.md"), "log.info(\"not python\")\n").unwrap();
    }

    fn driver(workers: usize) -> Driver {
        let config = ScanConfig {
            workers,
            ..Default::default()
        };
        Driver::new(config, CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_scan_repo_aggregates_files() {
        let dir = TempDir::new().unwrap();
        write_repo(dir.path());

        let result = driver(2).scan_repo("octo/demo", dir.path()).unwrap();

        assert_eq!(result.files_found, 3);
        assert_eq!(result.files_scanned, 3);
        assert_eq!(result.records.len(), 4);
        assert_eq!(result.generic_log_calls, 1);
        assert_eq!(result.rejected, 1);
        assert_eq!(result.decode_failures, 1);

        let paths: HashSet<&str> = result.records.iter().map(|r| r.path.as_str()).collect();
        assert!(paths.contains("octo/demo/app/main.py"));
        assert!(paths.contains("octo/demo/app/util/io.py"));
        assert!(paths.contains("octo/demo/app/util/blob.py"));
    }

    #[test]
    fn test_pool_size_does_not_change_records() {
        let dir = TempDir::new().unwrap();
        write_repo(dir.path());

        let single = driver(1).scan_repo("octo/demo", dir.path()).unwrap();
        let many = driver(8).scan_repo("octo/demo", dir.path()).unwrap();

        assert_eq!(single.records, many.records);
        assert_eq!(single.generic_log_calls, many.generic_log_calls);
    }

    #[test]
    fn test_cancelled_driver_dispatches_nothing() {
        let dir = TempDir::new().unwrap();
        write_repo(dir.path());

        let cancel = CancellationToken::new();
        let driver = Driver::new(ScanConfig::default(), cancel.clone()).unwrap();
        cancel.cancel();

        let result = driver.scan_repo("octo/demo", dir.path()).unwrap();
        assert_eq!(result.files_cancelled, 3);
        assert_eq!(result.files_scanned, 0);
        assert!(result.records.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_scanned() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(dir.path().join("own.py"), "log.info(\"own\")\n").unwrap();
        fs::write(outside.path().join("real.py"), "log.info(\"linked\")\n").unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.py"), dir.path().join("link.py"))
            .unwrap();

        let result = driver(1).scan_repo("octo/demo", dir.path()).unwrap();

        assert_eq!(result.files_found, 2);
        let found: Vec<(&str, &str)> = result
            .records
            .iter()
            .map(|r| (r.path.as_str(), r.full_content.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("octo/demo/link.py", "\"linked\""),
                ("octo/demo/own.py", "\"own\""),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_error() {
        let err = driver(1)
            .scan_repo("octo/gone", Path::new("/nonexistent/octo/gone"))
            .unwrap_err();
        assert!(matches!(err, ScanError::MissingRoot(_)));
    }
}
