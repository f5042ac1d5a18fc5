//! Scan a single file or directory and print the recognized logging calls as CSV.
//!
//! Usage:
//!     cargo run --bin scan_path -- path/to/checkout [-o calls.csv] [--repo owner/name]

use clap::Parser;
use log::info;
use logger_finder::interrupt::spawn_interrupt_handler;
use logger_finder::logging::init_logger;
use logger_finder::repo_list::repo_id_from_dir;
use logger_finder::walker::record_path;
use logger_finder::{
    scan_file, AcceptanceFilter, CancellationToken, CsvSink, Driver, FileContext, ScanConfig,
};
use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Scan one file or directory for logging calls
#[derive(Parser, Debug)]
#[command(name = "scan_path")]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file or directory
    path: PathBuf,

    /// Repository identifier (default: derived from the path)
    #[arg(long)]
    repo: Option<String>,

    /// Output CSV (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON scan configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(args.debug, None)?;

    let mut config = match &args.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    let (records, generic_log_calls) = if args.path.is_dir() {
        let repo = args.repo.clone().unwrap_or_else(|| repo_id_from_dir(&args.path));
        let cancel = CancellationToken::new();
        spawn_interrupt_handler(cancel.clone())?;
        let scan = Driver::new(config, cancel)?.scan_repo(&repo, &args.path)?;
        (scan.records, scan.generic_log_calls)
    } else {
        let parent = args.path.parent().unwrap_or(args.path.as_path());
        let repo = args.repo.clone().unwrap_or_else(|| repo_id_from_dir(parent));
        let ctx = FileContext::new(repo.as_str(), record_path(&repo, parent, &args.path));
        let scan = scan_file(&args.path, &ctx, &AcceptanceFilter::from_config(&config))?;
        (scan.records, scan.generic_log_calls)
    };

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = CsvSink::with_header(out)?;
    sink.write_all(&records)?;
    sink.flush()?;

    info!("{} calls, {} generic 'log' calls", records.len(), generic_log_calls);
    Ok(())
}
