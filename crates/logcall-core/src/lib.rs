//! # logcall-core
//!
//! Heuristic, regex-only recognizer for logging-library call sites in Python
//! sources, and the machinery to run it over cloned repositories.
//!
//! ## Modules
//!
//! - [`vocabulary`]: the verbosity token list and the regexes built from it
//! - [`scanner`]: the per-line state machine and per-file scan
//! - [`classify`]: verbosity categories, including guesses for `log(...)`
//! - [`filter`]: false-positive rejection (receiver denylist, empty calls)
//! - [`walker`]: candidate file enumeration
//! - [`driver`]: worker-pool fan-out over a repository
//! - [`sink`]: CSV output
//! - [`config`]: scan settings
//! - [`logging`]: logging setup for the binaries
//!
//! ## Example
//!
//! ```rust
//! use logcall_core::{scan_lines, AcceptanceFilter, FileContext, Verbosity};
//!
//! let ctx = FileContext::new("octo/demo", "octo/demo/app.py");
//! let scan = scan_lines(&ctx, &AcceptanceFilter::default(), ["log.info(\"ready\")"]);
//! assert_eq!(scan.records[0].verbosity, Verbosity::Info);
//! ```

pub mod cancellation;
pub mod classify;
pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod scanner;
pub mod sink;
pub mod types;
pub mod vocabulary;
pub mod walker;

/// Logging utilities
pub mod logging {
    use crate::error::{Result, ScanError};
    use log::LevelFilter;
    use std::env;
    use std::fs::OpenOptions;
    use std::path::Path;

    /// Initialize logger based on debug flag or environment variable.
    ///
    /// With a `log_file`, output is appended to that file instead of stderr.
    pub fn init_logger(debug: bool, log_file: Option<&Path>) -> Result<()> {
        let mut builder = if debug {
            let mut builder = env_logger::Builder::new();
            builder.filter_level(LevelFilter::Debug);
            builder
        } else if env::var("RUST_LOG").is_ok() {
            // Allow RUST_LOG to override if set
            env_logger::Builder::from_default_env()
        } else {
            let mut builder = env_logger::Builder::new();
            builder.filter_level(LevelFilter::Info);
            builder
        };

        if let Some(path) = log_file {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ScanError::io(path, e))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        builder.init();
        Ok(())
    }
}

// Re-export commonly used types
pub use cancellation::CancellationToken;
pub use config::ScanConfig;
pub use driver::{Driver, RepoScan};
pub use error::{Result, ScanError};
pub use filter::AcceptanceFilter;
pub use scanner::{scan_file, scan_lines, scan_reader, FileScan, ScanState};
pub use sink::{completed_repos, CsvSink};
pub use types::{FileContext, LoggerCall, Verbosity, COLUMNS};
