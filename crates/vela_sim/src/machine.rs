//! Mutable state shared by every region of one simulator.

use std::sync::Arc;

use vela_ir::{Design, ProcessId};

use crate::eval::Exec;
use crate::nba::NbaQueue;
use crate::rom::RomSet;
use crate::stats::StepStats;
use crate::store::SignalStore;

#[derive(Debug)]
pub(crate) struct Machine {
    pub(crate) design: Arc<Design>,
    pub(crate) store: SignalStore,
    pub(crate) nba: NbaQueue,
    pub(crate) roms: RomSet,
    pub(crate) display: Vec<String>,
    pub(crate) stats: StepStats,
}

impl Machine {
    pub(crate) fn new(design: Arc<Design>, store: SignalStore, roms: RomSet) -> Self {
        Self {
            design,
            store,
            nba: NbaQueue::new(),
            roms,
            display: Vec::new(),
            stats: StepStats::default(),
        }
    }

    /// Executes one process body.
    pub(crate) fn run_process(&mut self, id: ProcessId) {
        let mut exec = Exec {
            store: &mut self.store,
            nba: &mut self.nba,
            roms: &self.roms,
            display: &mut self.display,
            changed: 0,
        };
        exec.run(&self.design.processes[id].body);
        self.stats.processes_run += 1;
    }

    /// Executes process bodies in the given order.
    pub(crate) fn run_all(&mut self, ids: &[ProcessId]) {
        for &id in ids {
            self.run_process(id);
        }
    }
}
