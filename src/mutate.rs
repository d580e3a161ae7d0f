//! Minimal file mutation used to trigger the avalanche effect.

use std::fs;
use std::path::Path;

use crate::error::LabError;

/// Copy `source` to `dest` with a single space appended.
pub(crate) fn append_space(source: &Path, dest: &Path) -> Result<(), LabError> {
    let mut bytes = fs::read(source).map_err(|err| LabError::read(source, err))?;
    bytes.push(b' ');
    fs::write(dest, &bytes).map_err(|err| LabError::write(dest, err))
}
