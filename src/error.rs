//! Error taxonomy for the hashing pipeline.

use std::io;
use std::path::PathBuf;

/// Errors produced by the lab steps.
///
/// `Read`, `Write` and `AlgorithmUnavailable` are fatal and propagate to
/// `main`. `Upload` is best-effort: callers log it and keep going.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LabError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("hash algorithm unavailable: {name}")]
    AlgorithmUnavailable { name: String },

    #[error("upload of {key} failed: {message}")]
    Upload { key: String, message: String },
}

impl LabError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn upload(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upload {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_path_and_cause() {
        let err = LabError::read(
            "missing.txt",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.contains("missing.txt"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn upload_error_names_key() {
        let err = LabError::upload("original/file_hash.txt", "exit status 1");
        assert_eq!(
            err.to_string(),
            "upload of original/file_hash.txt failed: exit status 1"
        );
    }
}
