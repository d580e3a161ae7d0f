//! Positional comparison of two hex digests.

use serde::Serialize;

/// Outcome of comparing two digest strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Comparison {
    pub(crate) equal: bool,
    pub(crate) differing: usize,
    /// Number of character positions examined (length of the longer input).
    pub(crate) positions: usize,
}

/// Compare two digest strings character by character.
///
/// Inputs are expected to have equal length. When they do not, every
/// position past the end of the shorter string counts as differing.
pub(crate) fn compare(a: &str, b: &str) -> Comparison {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let overlap_diffs = a.chars().zip(b.chars()).filter(|(x, y)| x != y).count();
    let positions = a_len.max(b_len);
    Comparison {
        equal: a == b,
        differing: overlap_diffs + (positions - a_len.min(b_len)),
        positions,
    }
}
