//! Outcome summary for a completed load

use std::fmt;

/// Summary of a load in which every batch committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Total documents committed, always equal to the dataset length.
    pub committed: usize,
    /// Number of batch commits issued.
    pub batches: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "committed {} document(s) in {} batch(es)",
            self.committed, self.batches
        )
    }
}
