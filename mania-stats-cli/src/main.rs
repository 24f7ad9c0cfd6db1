//! Mania Stats CLI Application
//!
//! Command-line front end for the mania-stats library. It adds:
//! - TOML configuration for weights, exponent and streams
//! - Parallel analysis of several charts
//! - JSON output on stdout (logs go to stderr)

use anyhow::{Context, Result};
use clap::Parser;
use mania_stats::{Analyzer, StreamSelection};
use rayon::prelude::*;
use serde_json::Value;
use std::path::PathBuf;

mod config;
mod report;

use config::AppConfig;

/// Mania Stats - Pattern breakdown of 4K osu!mania charts
#[derive(Parser, Debug)]
#[command(name = "mania-stats-cli")]
#[command(about = "Score 4K osu!mania charts by movement pattern", long_about = None)]
#[command(version)]
struct Args {
    /// Path(s) to .osu chart file(s)
    #[arg(value_name = "CHART", required = true)]
    charts: Vec<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Analyze long note releases instead of onsets
    #[arg(long, conflicts_with = "both")]
    releases: bool,

    /// Analyze onsets and releases as two separate streams
    #[arg(long)]
    both: bool,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Mania Stats CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using analysis library v{}", mania_stats::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let mut analysis = app_config.analysis;
    if args.releases {
        analysis.streams = StreamSelection::Releases;
    } else if args.both {
        analysis.streams = StreamSelection::Both;
    }
    let pretty = app_config.output.pretty && !args.compact;

    let analyzer = Analyzer::new(analysis);
    let outputs = analyze_charts(&analyzer, &args.charts)?;

    println!("{}", report::render(&outputs, pretty)?);

    Ok(())
}

/// Analyze every chart in parallel, keeping argument order
fn analyze_charts(analyzer: &Analyzer, charts: &[PathBuf]) -> Result<Vec<(PathBuf, Value)>> {
    log::info!("Analyzing {} chart(s)", charts.len());

    charts
        .par_iter()
        .map(|path| -> Result<(PathBuf, Value)> {
            let chart_report = analyzer
                .analyze_file(path)
                .with_context(|| format!("Failed to analyze chart: {:?}", path))?;
            log::debug!("{:?} analyzed", path);
            Ok((path.clone(), report::chart_value(&chart_report)?))
        })
        .collect()
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    // stdout is reserved for the JSON document
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
