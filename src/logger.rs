//! Diagnostic logging to stderr and an optional log file.

use anyhow::{Context, Result};
use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// Map a level name to a filter; unknown names fall back to `info`.
pub(crate) fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Install the global logger. Stdout is left to the console report.
pub(crate) fn init_logger(level: &str, log_file: Option<&Path>) -> Result<()> {
    let mut dispatch = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(parse_level(level))
        .chain(std::io::stderr());
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }
    dispatch.apply().context("install logger")?;
    Ok(())
}
