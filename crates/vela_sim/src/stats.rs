//! Per-step and cumulative evaluation counters.

use serde::Serialize;

/// Counters for one call to `evaluate()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepStats {
    /// Whether the input-combinational region ran.
    pub input_comb_ran: bool,
    /// Settle-loop passes, summed over every settle of the step.
    pub settle_iterations: u32,
    /// Active/commit iterations.
    pub active_iterations: u32,
    /// Process bodies executed.
    pub processes_run: usize,
    /// Signals written by delayed-write commits.
    pub writes_committed: usize,
}

/// Counters accumulated over the lifetime of a simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    /// Completed `evaluate()` calls.
    pub steps: u64,
    /// Total settle-loop passes.
    pub settle_iterations: u64,
    /// Total active/commit iterations.
    pub active_iterations: u64,
    /// Total process bodies executed.
    pub processes_run: u64,
    /// Total signals written by commits.
    pub writes_committed: u64,
}

impl RunTotals {
    /// Adds one completed step.
    pub fn record(&mut self, step: &StepStats) {
        self.steps += 1;
        self.settle_iterations += u64::from(step.settle_iterations);
        self.active_iterations += u64::from(step.active_iterations);
        self.processes_run += step.processes_run as u64;
        self.writes_committed += step.writes_committed as u64;
    }
}
