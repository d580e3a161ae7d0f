//! Hashing lab entrypoint: hash a file, mutate it, re-hash and compare.

mod compare;
mod console;
mod digest;
mod error;
mod logger;
mod mutate;
mod pipeline;
mod report;
mod runner;
mod summary;
mod upload;

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::digest::Algorithm;
use crate::logger::init_logger;
use crate::pipeline::{run_lab, LabPaths};
use crate::summary::write_summary;
use crate::upload::{CommandUploader, ObjectStoreTarget, Uploader, DEFAULT_PROFILE, DEFAULT_REGION};

const DEFAULT_INPUT: &str = "original_file.txt";
const DEFAULT_REPORT: &str = "file_hash.txt";
const DEFAULT_MODIFIED: &str = "modified_file.txt";
const DEFAULT_MODIFIED_REPORT: &str = "modified_file_hash.txt";
const DEFAULT_ALGORITHM: &str = "SHA-256";
const DEFAULT_BUCKET: &str = "hashing-lab";
const DEFAULT_UPLOAD_TIMEOUT_MS: u64 = 120_000;

/// CLI arguments for the hashing lab.
#[derive(Parser, Debug)]
#[command(
    name = "hashlab",
    version,
    about = "Demonstrate the avalanche effect of a cryptographic hash"
)]
struct Args {
    /// File to hash
    #[arg(long, value_name = "PATH", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Report written for the original file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_REPORT)]
    report: PathBuf,

    /// Mutated copy of the input (one space appended)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MODIFIED)]
    modified: PathBuf,

    /// Report written for the mutated copy
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MODIFIED_REPORT)]
    modified_report: PathBuf,

    /// Hash algorithm (only SHA-256 is available)
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ALGORITHM)]
    algorithm: String,

    /// Object store bucket receiving the artifacts
    #[arg(long, default_value = DEFAULT_BUCKET)]
    bucket: String,

    /// Object store region
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// Credential profile handed to the object store client
    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Skip all uploads
    #[arg(long)]
    no_upload: bool,

    /// Kill an upload client that runs longer than this
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_UPLOAD_TIMEOUT_MS)]
    upload_timeout_ms: u64,

    /// Write a JSON summary of the run
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Diagnostic log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Also append diagnostics to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level, args.log_file.as_deref())?;
    run(args)
}

/// Resolve configuration and execute one lab run.
fn run(args: Args) -> Result<()> {
    let algorithm = Algorithm::parse(&args.algorithm).context("resolve hash algorithm")?;

    let uploader = if args.no_upload {
        log::info!("uploads disabled");
        None
    } else {
        let target = ObjectStoreTarget {
            bucket: args.bucket.clone(),
            region: args.region.clone(),
            profile: args.profile.clone(),
        };
        Some(CommandUploader::from_env(
            target,
            Duration::from_millis(args.upload_timeout_ms),
        )?)
    };

    let paths = LabPaths {
        input: args.input,
        report: args.report,
        modified: args.modified,
        modified_report: args.modified_report,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run_lab(
        algorithm,
        &paths,
        uploader.as_ref().map(|uploader| uploader as &dyn Uploader),
        &mut out,
    )?;

    if let Some(path) = &args.summary {
        write_summary(path, &summary)?;
        log::info!("summary written to {}", path.display());
    }
    Ok(())
}
