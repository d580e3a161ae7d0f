//! Plain-text hash reports.

use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::digest::{Algorithm, Digest};
use crate::error::LabError;

/// Timestamp layout written on the last report line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A report as written to disk.
#[derive(Debug, Clone)]
pub(crate) struct HashReport {
    pub(crate) path: PathBuf,
    pub(crate) label: String,
    pub(crate) digest_hex: String,
    pub(crate) generated_at: DateTime<Local>,
}

impl HashReport {
    pub(crate) fn new(path: &Path, algorithm: Algorithm, digest: &Digest) -> Self {
        Self {
            path: path.to_path_buf(),
            label: format!("{} Hash:", algorithm.name()),
            digest_hex: digest.to_hex(),
            generated_at: Local::now(),
        }
    }

    /// Label line, digest line, blank line, timestamp line.
    pub(crate) fn render(&self) -> String {
        format!(
            "{}\n{}\n\nGeneration date: {}\n",
            self.label,
            self.digest_hex,
            self.generated_at.format(TIMESTAMP_FORMAT)
        )
    }
}

/// Write a report for `digest`, replacing anything already at `path`.
pub(crate) fn write_report(
    algorithm: Algorithm,
    digest: &Digest,
    path: &Path,
) -> Result<HashReport, LabError> {
    let report = HashReport::new(path, algorithm, digest);
    let file = File::create(path).map_err(|err| LabError::write(path, err))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(report.render().as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|err| LabError::write(path, err))?;
    log::debug!("wrote report {}", path.display());
    Ok(report)
}
