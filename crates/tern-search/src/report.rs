use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Execution statistics of one engine run.
///
/// Attached to every search and optimization result, found or not, so
/// callers can log and compare runs across configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Candidate intervals whose image was computed and inspected.
    pub intervals_checked: u64,
    /// Terminal candidates recorded before the run ended.
    pub answers_recorded: u64,
    /// Largest number of live candidates at any point of the run.
    pub frontier_peak: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl RunReport {
    /// Tracks the frontier high-water mark.
    pub(crate) fn observe_frontier(&mut self, len: usize) {
        self.frontier_peak = self.frontier_peak.max(len);
    }
}
