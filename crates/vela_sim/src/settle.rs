//! Combinational regions: the settle loop and the input-combinational pass.
//!
//! Both run their processes in dependency order with blocking writes. The
//! settle loop repeats until none of its triggers fire; the
//! input-combinational pass runs at most once per step, since nothing but
//! the external driver changes its inputs.

use std::collections::BTreeSet;

use tracing::{trace, warn};
use vela_ir::{Design, ProcessId, SignalId};

use crate::error::SimError;
use crate::machine::Machine;
use crate::region::Region;
use crate::store::SignalStore;
use crate::trigger::{OneShot, RegionTriggers};

/// The trigger table and process order of one combinational region.
#[derive(Debug, Clone)]
pub(crate) struct CombRegion {
    triggers: RegionTriggers,
    processes: Vec<ProcessId>,
    limit: u32,
}

impl CombRegion {
    fn build(
        region: Region,
        first: OneShot,
        store: &mut SignalStore,
        design: &Design,
        processes: Vec<ProcessId>,
        watch: &BTreeSet<SignalId>,
        limit: u32,
    ) -> Self {
        let mut triggers = RegionTriggers::new(region);
        // A region without processes never needs to run.
        if !processes.is_empty() {
            triggers.add_one_shot(first);
            for &signal in watch {
                let description = format!("@([changed] {})", design.signal_name(signal));
                triggers.add_change(store, signal, description);
            }
        }
        Self {
            triggers,
            processes,
            limit,
        }
    }

    /// Creates the settle loop.
    pub(crate) fn settle(
        store: &mut SignalStore,
        design: &Design,
        processes: Vec<ProcessId>,
        watch: &BTreeSet<SignalId>,
        limit: u32,
    ) -> Self {
        Self::build(
            Region::Settle,
            OneShot::FirstSettle,
            store,
            design,
            processes,
            watch,
            limit,
        )
    }

    /// Creates the input-combinational pass.
    pub(crate) fn input_comb(
        store: &mut SignalStore,
        design: &Design,
        processes: Vec<ProcessId>,
        watch: &BTreeSet<SignalId>,
    ) -> Self {
        Self::build(
            Region::InputComb,
            OneShot::FirstInputComb,
            store,
            design,
            processes,
            watch,
            1,
        )
    }

    /// Runs every process once if any trigger fires. Returns whether it ran.
    pub(crate) fn run_once(&mut self, machine: &mut Machine) -> bool {
        let fired = self.triggers.evaluate(&mut machine.store);
        if !fired.any() {
            return false;
        }
        trace!(region = %self.triggers.region(), "{}", self.triggers.describe(&fired));
        machine.run_all(&self.processes);
        true
    }

    /// Runs the region until no trigger fires and returns the number of
    /// passes taken.
    ///
    /// Fails with [`SimError::NonConvergence`] when triggers are still active
    /// after `limit` passes.
    pub(crate) fn run_to_fixpoint(&mut self, machine: &mut Machine) -> Result<u32, SimError> {
        let region = self.triggers.region();
        let mut iterations = 0;
        loop {
            let fired = self.triggers.evaluate(&mut machine.store);
            if !fired.any() {
                break;
            }
            if iterations == self.limit {
                warn!(%region, iterations, limit = self.limit, "region did not converge");
                return Err(SimError::NonConvergence {
                    region,
                    iterations,
                    limit: self.limit,
                    active: self.triggers.describe(&fired),
                });
            }
            trace!(%region, iteration = iterations, "{}", self.triggers.describe(&fired));
            machine.run_all(&self.processes);
            iterations += 1;
        }
        machine.stats.settle_iterations += iterations;
        Ok(iterations)
    }
}
