/// Summarize a logger-call CSV export
///
/// Usage:
///   cargo run --bin summarize_calls -- logger_calls.csv [--top 15]
use clap::Parser;
use logcall_cli::CallSummary;
use logcall_core::logging::init_logger;
use logcall_core::Verbosity;
use std::error::Error;
use std::path::PathBuf;

/// Print the verbosity distribution of a logger-call export
#[derive(Parser, Debug)]
#[command(name = "summarize_calls")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV written by logger_finder
    input: PathBuf,

    /// How many repositories and receivers to list
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(args.debug, None)?;

    if !args.input.exists() {
        eprintln!("Error: input CSV does not exist: {}", args.input.display());
        std::process::exit(1);
    }

    log::info!("Reading CSV from: {}", args.input.display());
    let summary = CallSummary::from_csv(&args.input)?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("LOGGER CALLS");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("Total calls: {}", summary.total);
    println!("Repositories: {}", summary.by_repo.len());
    println!("Generic 'log' calls: {}", summary.generic);
    println!();

    println!("By verbosity:");
    for verbosity in Verbosity::ALL {
        let count = summary.by_verbosity.get(&verbosity).copied().unwrap_or(0);
        println!(
            "  {:<9} (level {:>2}): {:>8}  {:>5.1}%",
            verbosity.as_str(),
            verbosity.level(),
            count,
            summary.percentage(verbosity)
        );
    }
    println!();

    let mut repos: Vec<(&String, &usize)> = summary.by_repo.iter().collect();
    repos.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    println!("Top repositories:");
    for (repo, count) in repos.into_iter().take(args.top) {
        println!("  • {} ({})", repo, count);
    }
    println!();

    println!("Top receivers:");
    for (receiver, count) in summary.top_receivers(args.top) {
        println!("  • {} ({})", receiver, count);
    }
    println!();
    println!("═══════════════════════════════════════════════════════════════");

    Ok(())
}
