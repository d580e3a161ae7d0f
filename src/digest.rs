//! SHA-256 digests of whole files.

use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::LabError;

/// Digest length in bytes.
pub(crate) const DIGEST_LEN: usize = 32;

/// Supported hash algorithm. Only SHA-256 is wired in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Algorithm {
    Sha256,
}

impl Algorithm {
    /// Resolve an algorithm by name (`SHA-256`, `sha256`, `sha_256`).
    pub(crate) fn parse(name: &str) -> Result<Self, LabError> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "sha256" => Ok(Self::Sha256),
            _ => Err(LabError::AlgorithmUnavailable {
                name: name.to_string(),
            }),
        }
    }

    /// Display name used in reports and console output.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
        }
    }
}

/// A computed digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Lowercase hex, two digits per byte.
    pub(crate) fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hash raw bytes.
pub(crate) fn digest_bytes(bytes: &[u8]) -> Digest {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha256::digest(bytes));
    Digest(out)
}

/// Hash a file by reading it fully into memory first.
pub(crate) fn digest_file(path: &Path) -> Result<Digest, LabError> {
    let bytes = fs::read(path).map_err(|err| LabError::read(path, err))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(digest_bytes(&bytes))
}
