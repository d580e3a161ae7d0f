//! Console rendering for the comparison and conclusion blocks.

use crate::compare::Comparison;

/// Width of the `=` separator lines.
pub(crate) const SEPARATOR_WIDTH: usize = 70;

fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Render the side-by-side comparison block, framed by separator lines.
pub(crate) fn comparison_block(
    label1: &str,
    hash1: &str,
    label2: &str,
    hash2: &str,
    comparison: &Comparison,
) -> String {
    let mut block = String::new();
    block.push('\n');
    block.push_str(&separator());
    block.push_str("\nHASH COMPARISON\n");
    block.push_str(&separator());
    block.push('\n');
    block.push_str(&format!("{label1}:\n{hash1}\n"));
    block.push_str(&format!("\n{label2}:\n{hash2}\n"));
    let verdict = if comparison.equal { "YES ✓" } else { "NO ✗" };
    block.push_str(&format!("\nAre the hashes identical? {verdict}\n"));
    if !comparison.equal {
        block.push_str(&format!(
            "Number of different characters: {}/{}\n",
            comparison.differing, comparison.positions
        ));
    }
    block.push_str(&separator());
    block.push_str("\n\n");
    block
}

/// Closing remarks printed after the run.
pub(crate) fn conclusion(algorithm_name: &str) -> String {
    format!(
        "=== CONCLUSION ===\n\
         • A minimal change (1 character) produces a completely different hash\n\
         • This demonstrates the avalanche effect of {algorithm_name}\n\
         • Hashing allows detection of any file modification\n\
         • Essential for data integrity verification\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare;

    #[test]
    fn unequal_block_reports_tally() {
        let comparison = compare("abcd", "abzz");
        let block = comparison_block("Original Hash", "abcd", "Modified Hash", "abzz", &comparison);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(70));
        assert_eq!(lines[2], "HASH COMPARISON");
        assert_eq!(lines[3], "=".repeat(70));
        assert_eq!(lines[4], "Original Hash:");
        assert_eq!(lines[5], "abcd");
        assert!(block.contains("\nModified Hash:\nabzz\n"));
        assert!(block.contains("Are the hashes identical? NO ✗"));
        assert!(block.contains("Number of different characters: 2/4"));
        assert!(block.ends_with(&format!("{}\n\n", "=".repeat(70))));
    }

    #[test]
    fn equal_block_omits_tally() {
        let comparison = compare("abcd", "abcd");
        let block = comparison_block("A", "abcd", "B", "abcd", &comparison);
        assert!(block.contains("Are the hashes identical? YES ✓"));
        assert!(!block.contains("Number of different characters"));
    }

    #[test]
    fn conclusion_names_algorithm() {
        let text = conclusion("SHA-256");
        assert!(text.starts_with("=== CONCLUSION ===\n"));
        assert!(text.contains("avalanche effect of SHA-256"));
        assert_eq!(text.lines().count(), 5);
    }
}
