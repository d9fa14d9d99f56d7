//! harvest: recover chat conversations from a HAR network capture.
//!
//! Reads a HAR log, runs the reconstruction pipeline over every captured
//! transaction, and writes three artifacts: a flat JSON dump of recovered
//! records, a JSON dump of time-clustered sessions, and one markdown
//! document per session.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use harvest_core::{har, HarvestConfig, MarkdownRenderer};

mod output;

#[derive(Parser, Debug)]
#[command(
    name = "harvest",
    version,
    about = "Recover chat conversations from a HAR network capture"
)]
struct Args {
    /// HAR capture to read (overrides the configured path)
    har_file: Option<String>,

    /// Directory the recovered artifacts are written into
    #[arg(short, long, default_value = ".")]
    out_dir: String,

    /// Optional TOML config file
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => match HarvestConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => HarvestConfig::default(),
    };
    if let Some(har_file) = args.har_file {
        config.input.har_path = har_file;
    }

    let har_path = config.har_path();
    let transactions = match har::load_transactions(&har_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to read HAR log {}: {}", har_path.display(), e);
            std::process::exit(1);
        }
    };

    let renderer = MarkdownRenderer;
    let result = harvest_engine::run_pipeline(&transactions, &config, &renderer);

    if result.records.is_empty() {
        println!("No chat records found in {}.", har_path.display());
        return Ok(());
    }

    let out_dir = std::path::Path::new(&args.out_dir);
    output::write_outputs(out_dir, &config, &result)?;

    println!(
        "Recovered {} records across {} sessions ({} entries scanned, {} duplicates dropped).",
        result.report.records_recovered,
        result.report.sessions_built,
        result.report.entries_processed,
        result.report.duplicates_dropped
    );
    println!("Output written to {}", out_dir.display());

    Ok(())
}
