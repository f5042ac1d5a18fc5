//! Batch scan of cloned repositories for logging calls.
//!
//! Reads a list of `owner/name` repositories, scans each checkout under the
//! repositories root and appends every recognized logging call to one CSV.
//!
//! Usage:
//!     cargo run --bin logger_finder -- /data/github_repos selected_repos -o logger_calls.csv
//!
//! A fresh run truncates the output first; `--resume` keeps it and skips
//! repositories that already have rows.

use clap::Parser;
use log::{error, info, warn};
use logger_finder::interrupt::spawn_interrupt_handler;
use logger_finder::logging::init_logger;
use logger_finder::repo_list::read_repo_list;
use logger_finder::{completed_repos, CancellationToken, CsvSink, Driver, ScanConfig, ScanError};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

/// Find logging-library calls in cloned repositories and export them to CSV
#[derive(Parser, Debug)]
#[command(name = "logger_finder")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the checkouts as <owner>/<name>
    repos_root: PathBuf,

    /// File listing one owner/name per line
    repo_list: PathBuf,

    /// Output CSV
    #[arg(short, long, default_value = "logger_calls.csv")]
    output: PathBuf,

    /// Keep the existing output and skip repositories already in it
    #[arg(long)]
    resume: bool,

    /// JSON scan configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Receiver names that are never loggers (replaces the configured list)
    #[arg(long = "deny", value_name = "NAME")]
    deny: Vec<String>,

    /// Source file suffix to scan
    #[arg(long)]
    extension: Option<String>,

    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Write the log to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<ScanConfig, ScanError> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if !args.deny.is_empty() {
        config.denylist = args.deny.clone();
    }
    if let Some(extension) = &args.extension {
        config.extension = extension.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    Ok(config)
}

#[derive(Default)]
struct Totals {
    repos_scanned: usize,
    repos_skipped: usize,
    repos_missing: usize,
    files_scanned: usize,
    decode_failures: usize,
    rows: usize,
    generic_log_calls: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(args.debug, args.log_file.as_deref())?;

    let start = Instant::now();
    let config = load_config(&args)?;
    let repos = read_repo_list(&args.repo_list)?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone())?;
    let driver = Driver::new(config, cancel.clone())?;
    info!(
        "Scanning {} repositories under {} with {} workers",
        repos.len(),
        args.repos_root.display(),
        driver.workers()
    );

    let (done, mut sink) = if args.resume {
        let done = completed_repos(&args.output)?;
        info!("Resuming: {} repositories already in {}", done.len(), args.output.display());
        (done, CsvSink::append(&args.output)?)
    } else {
        (Default::default(), CsvSink::create(&args.output)?)
    };

    let mut totals = Totals::default();
    for repo in &repos {
        if cancel.is_cancelled() {
            warn!("Stopping before {}", repo);
            break;
        }
        if done.contains(repo) {
            warn!("Skipping: {}", repo);
            totals.repos_skipped += 1;
            continue;
        }

        info!("Began: {}", repo);
        let scan = match driver.scan_repo(repo, &args.repos_root.join(repo)) {
            Ok(scan) => scan,
            Err(e) => {
                error!("{} | {}", repo, e);
                totals.repos_missing += 1;
                continue;
            }
        };
        if scan.files_cancelled > 0 {
            // Partial repositories are not written, so --resume rescans them.
            warn!("{} | interrupted, discarding {} calls", repo, scan.records.len());
            break;
        }
        sink.write_all(&scan.records)?;
        sink.flush()?;

        totals.repos_scanned += 1;
        totals.files_scanned += scan.files_scanned;
        totals.decode_failures += scan.decode_failures;
        totals.rows += scan.records.len();
        totals.generic_log_calls += scan.generic_log_calls;
        info!(
            "Ended: {} ({} calls in {} files, {:.3}s)",
            repo,
            scan.records.len(),
            scan.files_scanned,
            scan.duration.as_secs_f64()
        );
    }

    let elapsed = start.elapsed().as_secs_f64();
    info!("Number of 'log' statements: {}", totals.generic_log_calls);
    info!("Time spent: {:.3} seconds", elapsed);

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("LOGGER CALL SCAN");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("Repositories listed: {}", repos.len());
    println!("  ├─ Scanned: {}", totals.repos_scanned);
    println!("  ├─ Skipped (already in output): {}", totals.repos_skipped);
    println!("  └─ Missing or unreadable: {}", totals.repos_missing);
    println!("Files scanned: {}", totals.files_scanned);
    println!("  └─ Stopped at undecodable line: {}", totals.decode_failures);
    println!("Rows written: {}", totals.rows);
    println!("Generic 'log' calls: {}", totals.generic_log_calls);
    println!("Time spent: {:.3} seconds", elapsed);
    if cancel.is_cancelled() {
        println!();
        println!("⚠ Interrupted: rerun with --resume to continue");
    }
    println!("Output: {}", args.output.display());

    Ok(())
}
