use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use msg_extract::{CfbEntries, ChardetDetector, DecodeOptions, MIN_BODY_LEN, decode_with_options};
use tracing_subscriber::EnvFilter;

/// Decode an Outlook .msg file and print it as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the .msg file
    path: PathBuf,

    /// Log every decoded property
    #[arg(long)]
    trace: bool,

    /// Minimum length of an accepted body candidate
    #[arg(long, default_value_t = MIN_BODY_LEN)]
    min_body_len: usize,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.trace { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = DecodeOptions {
        trace: args.trace,
        min_body_len: args.min_body_len,
    };

    let entries = CfbEntries::open(&args.path)
        .with_context(|| format!("opening {}", args.path.display()))?;
    let message = decode_with_options(entries, &options, &ChardetDetector)
        .with_context(|| format!("decoding {}", args.path.display()))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&message)?
    } else {
        serde_json::to_string(&message)?
    };
    println!("{json}");

    Ok(())
}
