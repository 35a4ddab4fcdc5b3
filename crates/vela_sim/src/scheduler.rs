//! The clocked region scheduler.
//!
//! One iteration is an active pass followed by a commit pass: every clocked
//! process whose domain fired computes its next state from the current
//! store into the delayed-write queue, then the queue is applied at once and
//! the settle loop re-runs. Iterations repeat while commits keep producing
//! new edges, as happens with clocks derived from registers.

use tracing::{trace, warn};
use vela_ir::ProcessId;

use crate::error::SimError;
use crate::machine::Machine;
use crate::region::Region;
use crate::schedule::Schedule;
use crate::settle::CombRegion;
use crate::store::SignalStore;
use crate::trigger::RegionTriggers;

/// Active-region triggers, one per clock domain.
#[derive(Debug, Clone)]
pub(crate) struct ActiveRegion {
    triggers: RegionTriggers,
    clocked: Vec<(ProcessId, usize)>,
    limit: u32,
}

impl ActiveRegion {
    pub(crate) fn new(store: &mut SignalStore, schedule: &Schedule, limit: u32) -> Self {
        let mut triggers = RegionTriggers::new(Region::Active);
        for domain in &schedule.domains {
            triggers.add_edges(store, &domain.sensitivity, domain.description.clone());
        }
        Self {
            triggers,
            clocked: schedule.clocked.clone(),
            limit,
        }
    }

    /// Runs active/commit iterations until no domain fires, re-settling
    /// after every commit.
    pub(crate) fn run(
        &mut self,
        machine: &mut Machine,
        settle: &mut CombRegion,
    ) -> Result<u32, SimError> {
        let mut iterations = 0;
        loop {
            let fired = self.triggers.evaluate(&mut machine.store);
            if !fired.any() {
                break;
            }
            if iterations == self.limit {
                warn!(region = %Region::Active, iterations, limit = self.limit, "region did not converge");
                return Err(SimError::NonConvergence {
                    region: Region::Active,
                    iterations,
                    limit: self.limit,
                    active: self.triggers.describe(&fired),
                });
            }
            trace!(region = %Region::Active, iteration = iterations, "{}", self.triggers.describe(&fired));

            for &(process, domain) in &self.clocked {
                if fired.get(domain) {
                    machine.run_process(process);
                }
            }

            let summary = machine.nba.commit(&mut machine.store);
            trace!(
                region = %Region::NonBlockingAssign,
                signals = summary.signals,
                changed = summary.changed,
                "committed delayed writes"
            );
            machine.stats.writes_committed += summary.signals;

            settle.run_to_fixpoint(machine)?;
            iterations += 1;
        }
        machine.stats.active_iterations += iterations;
        Ok(iterations)
    }
}
