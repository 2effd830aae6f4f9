//! Engine result types

use serde::Serialize;

/// How a fix attempt ended successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// The corrector ran and exited 0
    Corrected,
    /// Owner is an administrator; recorded Fixed without running the corrector
    Exempt,
    /// The file no longer exists; its entry was deleted
    Retired,
}

impl FixOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixOutcome::Corrected => "corrected",
            FixOutcome::Exempt => "exempt",
            FixOutcome::Retired => "retired",
        }
    }
}

/// Tally of one sweep pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub examined: usize,
    pub corrected: usize,
    pub exempt: usize,
    pub retired: usize,
    pub failed: usize,
}

impl SweepReport {
    pub fn record(&mut self, outcome: Option<FixOutcome>) {
        self.examined += 1;
        match outcome {
            Some(FixOutcome::Corrected) => self.corrected += 1,
            Some(FixOutcome::Exempt) => self.exempt += 1,
            Some(FixOutcome::Retired) => self.retired += 1,
            None => self.failed += 1,
        }
    }
}
