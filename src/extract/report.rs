//! Extraction run summary

use std::fmt;

/// Counts gathered during one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Entries selected by a pattern
    pub matched: usize,
    /// Entries written to disk this run
    pub extracted: usize,
    /// Matched entries skipped because their checksum was already recorded
    pub unchanged: usize,
    /// Entries no pattern selected
    pub unmatched: usize,
    /// Paths of matched entries that could not be extracted
    pub failed: Vec<String>,
    /// Whether the run stopped early on a cancellation request
    pub cancelled: bool,
}

impl ExtractReport {
    /// Entries visited before the loop ended
    pub fn visited(&self) -> usize {
        self.matched + self.unmatched
    }
}

impl fmt::Display for ExtractReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} extracted, {} unchanged, {} failed ({} matched, {} not matched)",
            self.extracted,
            self.unchanged,
            self.failed.len(),
            self.matched,
            self.unmatched
        )?;
        if self.cancelled {
            write!(f, "; interrupted")?;
        }
        Ok(())
    }
}
