//! The linear hash, mutate, re-hash and compare run.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::compare::compare;
use crate::console::{comparison_block, conclusion};
use crate::digest::{digest_file, Algorithm};
use crate::mutate::append_space;
use crate::report::{write_report, HashReport};
use crate::summary::{ArtifactMeta, RunSummary, UploadRecord, UploadStatus, TOOL_VERSION};
use crate::upload::{object_key, Uploader, MODIFIED_PREFIX, ORIGINAL_PREFIX};

/// Files read and written during a run.
#[derive(Debug, Clone)]
pub(crate) struct LabPaths {
    pub(crate) input: PathBuf,
    pub(crate) report: PathBuf,
    pub(crate) modified: PathBuf,
    pub(crate) modified_report: PathBuf,
}

/// Execute the full run, writing progress to `out`.
///
/// Read, write and hashing failures abort the run. Upload failures are
/// logged, recorded in the summary and skipped.
pub(crate) fn run_lab(
    algorithm: Algorithm,
    paths: &LabPaths,
    uploader: Option<&dyn Uploader>,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    let mut uploads = Vec::new();

    writeln!(out, "=== PART 1: ORIGINAL FILE HASHING ===\n")?;
    let original_digest = digest_file(&paths.input)?;
    writeln!(out, "✓ Hash generated for the original file:")?;
    writeln!(out, "{original_digest}")?;
    let original_report = write_report(algorithm, &original_digest, &paths.report)?;
    writeln!(out, "✓ Hash saved in: {}", paths.report.display())?;

    if let Some(uploader) = uploader {
        writeln!(out, "\n=== UPLOADING TO S3 ===")?;
        for path in [&paths.report, &paths.input] {
            uploads.push(upload_best_effort(uploader, ORIGINAL_PREFIX, path, out)?);
        }
    }

    writeln!(out, "\n=== PART 2: MODIFICATION AND NEW HASH ===\n")?;
    append_space(&paths.input, &paths.modified)?;
    writeln!(out, "✓ Modified file created (added a space)")?;
    let modified_digest = digest_file(&paths.modified)?;
    let modified_report = write_report(algorithm, &modified_digest, &paths.modified_report)?;
    writeln!(out, "✓ New hash generated and saved")?;

    let original_hex = original_digest.to_hex();
    let modified_hex = modified_digest.to_hex();
    let comparison = compare(&original_hex, &modified_hex);
    write!(
        out,
        "{}",
        comparison_block(
            "Original Hash",
            &original_hex,
            "Modified Hash",
            &modified_hex,
            &comparison
        )
    )?;

    if let Some(uploader) = uploader {
        writeln!(out, "\n=== UPLOADING MODIFIED FILES TO S3 ===")?;
        for path in [&paths.modified_report, &paths.modified] {
            uploads.push(upload_best_effort(uploader, MODIFIED_PREFIX, path, out)?);
        }
    }

    write!(out, "{}", conclusion(algorithm.name()))?;
    out.flush().context("flush console output")?;

    Ok(RunSummary {
        tool_version: TOOL_VERSION.to_string(),
        algorithm: algorithm.name().to_string(),
        original: artifact_meta(&paths.input, &original_report),
        modified: artifact_meta(&paths.modified, &modified_report),
        comparison,
        uploads,
    })
}

/// Upload one file; failures are logged and never propagated.
fn upload_best_effort(
    uploader: &dyn Uploader,
    prefix: &str,
    path: &Path,
    out: &mut dyn Write,
) -> Result<UploadRecord> {
    let result = object_key(prefix, path).and_then(|key| {
        log::info!("uploading {} to {}", path.display(), uploader.describe(&key));
        uploader.upload(&key, path).map(|()| key)
    });
    let record = match result {
        Ok(key) => {
            writeln!(out, "✓ File uploaded successfully to S3: {key}")?;
            UploadRecord {
                key,
                path: path.display().to_string(),
                status: UploadStatus::Uploaded,
                error: None,
            }
        }
        Err(err) => {
            log::error!("Error during S3 upload: {err}");
            let key = object_key(prefix, path).unwrap_or_else(|_| prefix.to_string());
            UploadRecord {
                key,
                path: path.display().to_string(),
                status: UploadStatus::Failed,
                error: Some(err.to_string()),
            }
        }
    };
    Ok(record)
}

fn artifact_meta(input: &Path, report: &HashReport) -> ArtifactMeta {
    ArtifactMeta {
        path: input.display().to_string(),
        report_path: report.path.display().to_string(),
        sha256: report.digest_hex.clone(),
        generated_at: report.generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabError;
    use std::cell::RefCell;
    use std::fs;

    const HELLO: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
    const HELLO_SPACE: &str = "9e1b04359ce9f650852b7f468eb9cbaa8198d8678a7ddce5caaeb123b76439ff";

    /// Records every call and fails keys containing `fail_on`.
    struct RecordingUploader {
        calls: RefCell<Vec<(String, PathBuf)>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingUploader {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl Uploader for RecordingUploader {
        fn upload(&self, key: &str, local_path: &Path) -> Result<(), LabError> {
            self.calls
                .borrow_mut()
                .push((key.to_string(), local_path.to_path_buf()));
            match self.fail_on {
                Some(pattern) if key.contains(pattern) => {
                    Err(LabError::upload(key, "simulated outage"))
                }
                _ => Ok(()),
            }
        }
    }

    fn lab_paths(dir: &Path) -> LabPaths {
        LabPaths {
            input: dir.join("original_file.txt"),
            report: dir.join("file_hash.txt"),
            modified: dir.join("modified_file.txt"),
            modified_report: dir.join("modified_file_hash.txt"),
        }
    }

    #[test]
    fn hello_world_run_without_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let paths = lab_paths(dir.path());
        fs::write(&paths.input, "hello world").unwrap();
        let mut out = Vec::new();

        let summary = run_lab(Algorithm::Sha256, &paths, None, &mut out).unwrap();

        assert_eq!(summary.original.sha256, HELLO);
        assert_eq!(summary.modified.sha256, HELLO_SPACE);
        assert!(!summary.comparison.equal);
        assert_eq!(summary.comparison.differing, 57);
        assert!(summary.uploads.is_empty());

        assert_eq!(fs::read(&paths.modified).unwrap(), b"hello world ");
        assert!(fs::read_to_string(&paths.report).unwrap().contains(HELLO));
        assert!(fs::read_to_string(&paths.modified_report)
            .unwrap()
            .contains(HELLO_SPACE));

        let console = String::from_utf8(out).unwrap();
        assert!(console.starts_with("=== PART 1: ORIGINAL FILE HASHING ===\n"));
        assert!(console.contains("Are the hashes identical? NO ✗"));
        assert!(console.contains("Number of different characters: 57/64"));
        assert!(!console.contains("UPLOADING"));
        assert!(console.contains("=== CONCLUSION ==="));
    }

    #[test]
    fn uploads_reports_and_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = lab_paths(dir.path());
        fs::write(&paths.input, "payload").unwrap();
        let uploader = RecordingUploader::new(None);
        let mut out = Vec::new();

        let summary = run_lab(Algorithm::Sha256, &paths, Some(&uploader), &mut out).unwrap();

        let keys: Vec<String> = uploader
            .calls
            .borrow()
            .iter()
            .map(|(key, _)| key.clone())
            .collect();
        assert_eq!(
            keys,
            vec![
                "original/file_hash.txt",
                "original/original_file.txt",
                "modified/modified_file_hash.txt",
                "modified/modified_file.txt",
            ]
        );
        assert!(summary
            .uploads
            .iter()
            .all(|record| record.status == UploadStatus::Uploaded));
        let console = String::from_utf8(out).unwrap();
        assert!(console.contains("=== UPLOADING TO S3 ==="));
        assert!(console.contains("=== UPLOADING MODIFIED FILES TO S3 ==="));
        assert!(console.contains("✓ File uploaded successfully to S3: modified/modified_file.txt"));
    }

    #[test]
    fn upload_failures_do_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let paths = lab_paths(dir.path());
        fs::write(&paths.input, "payload").unwrap();
        let uploader = RecordingUploader::new(Some("original/"));
        let mut out = Vec::new();

        let summary = run_lab(Algorithm::Sha256, &paths, Some(&uploader), &mut out).unwrap();

        assert_eq!(uploader.calls.borrow().len(), 4);
        let failed: Vec<&UploadRecord> = summary
            .uploads
            .iter()
            .filter(|record| record.status == UploadStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].key, "original/file_hash.txt");
        assert!(failed[0]
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("simulated outage"));
        assert!(paths.modified_report.exists());
        let console = String::from_utf8(out).unwrap();
        assert!(!console.contains("successfully to S3: original/"));
        assert!(console.contains("=== CONCLUSION ==="));
    }

    #[test]
    fn missing_input_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = lab_paths(dir.path());
        let mut out = Vec::new();

        let err = run_lab(Algorithm::Sha256, &paths, None, &mut out).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LabError>(),
            Some(LabError::Read { .. })
        ));
        assert!(!paths.report.exists());
        assert!(!paths.modified.exists());
    }

    #[test]
    fn report_write_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = lab_paths(dir.path());
        fs::write(&paths.input, "payload").unwrap();
        paths.report = dir.path().join("missing").join("file_hash.txt");
        let uploader = RecordingUploader::new(None);
        let mut out = Vec::new();

        let err = run_lab(Algorithm::Sha256, &paths, Some(&uploader), &mut out).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LabError>(),
            Some(LabError::Write { .. })
        ));
        assert!(uploader.calls.borrow().is_empty());
    }
}
