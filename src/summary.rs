//! Machine-readable run summary.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::compare::Comparison;

/// Tool version emitted in the summary.
pub(crate) const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Top-level summary written with `--summary`.
#[derive(Serialize, Debug)]
pub(crate) struct RunSummary {
    pub(crate) tool_version: String,
    pub(crate) algorithm: String,
    pub(crate) original: ArtifactMeta,
    pub(crate) modified: ArtifactMeta,
    pub(crate) comparison: Comparison,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) uploads: Vec<UploadRecord>,
}

/// A hashed input and its report.
#[derive(Serialize, Debug, Clone)]
pub(crate) struct ArtifactMeta {
    pub(crate) path: String,
    pub(crate) report_path: String,
    pub(crate) sha256: String,
    pub(crate) generated_at: String,
}

/// Result of one best-effort upload.
#[derive(Serialize, Debug, Clone)]
pub(crate) struct UploadRecord {
    pub(crate) key: String,
    pub(crate) path: String,
    pub(crate) status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum UploadStatus {
    Uploaded,
    Failed,
}

/// Serialize and write the summary as pretty JSON.
pub(crate) fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_vec_pretty(summary).context("serialize run summary")?;
    fs::write(path, json).with_context(|| format!("write run summary {}", path.display()))?;
    Ok(())
}
