//! pdfdelta - Compare two compressed data streams byte-for-byte
//!
//! Decodes both inputs (optionally through the LZW filter) and logs
//! every difference to an append-mode JSON-lines file. Exits nonzero
//! when the inputs differ or a side fails to decode.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use memmap2::Mmap;
use pdfdelta_core::compare::{CompareJob, DiffLog, run_jobs};
use pdfdelta_core::pdftypes::{PDFObject, PDFStream};
use tracing_subscriber::EnvFilter;

/// Compare two compressed data streams byte-for-byte.
#[derive(Parser, Debug)]
#[command(name = "pdfdelta")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Left-hand input file
    lhs: PathBuf,

    /// Right-hand input file
    rhs: PathBuf,

    /// Treat inputs as bare LZW-compressed streams and compare the
    /// decoded bytes
    #[arg(long, action = ArgAction::SetTrue)]
    lzw: bool,

    /// EarlyChange setting for LZW decoding (0 or 1)
    #[arg(long = "early-change", default_value = "1")]
    early_change: i32,

    /// Path of the append-mode difference log
    #[arg(short = 'o', long = "log", default_value = "pdfdelta.jsonl")]
    log: PathBuf,

    /// Number of worker threads
    #[arg(short = 'j', long, default_value = "2")]
    workers: usize,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn load_stream(path: &Path, lzw: bool, early_change: i32) -> anyhow::Result<PDFStream> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("memory-mapping {}", path.display()))?;

    let mut attrs = HashMap::new();
    if lzw {
        attrs.insert("Filter".to_string(), PDFObject::Name("LZWDecode".into()));
        attrs.insert(
            "DecodeParms".to_string(),
            PDFObject::Dict(HashMap::from([(
                "EarlyChange".to_string(),
                PDFObject::Int(i64::from(early_change)),
            )])),
        );
    }
    Ok(PDFStream::new(attrs, mmap.to_vec()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let lhs = load_stream(&args.lhs, args.lzw, args.early_change)?;
    let rhs = load_stream(&args.rhs, args.lzw, args.early_change)?;
    let label = format!("{} vs {}", args.lhs.display(), args.rhs.display());

    let mut log = DiffLog::append_to(&args.log)
        .with_context(|| format!("opening log {}", args.log.display()))?;
    let summary = run_jobs(vec![CompareJob::new(label, lhs, rhs)], args.workers, &mut log)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    if summary.differing + summary.failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
