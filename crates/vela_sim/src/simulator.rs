//! The top-level driver.
//!
//! A [`Simulator`] owns one independent instance of a design: its signal
//! store, its trigger tables and its delayed-write queue. The host drives
//! primary inputs, calls [`Simulator::evaluate`] once per input change, and
//! reads outputs back once the step has converged.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};
use vela_common::Bits;
use vela_config::{load_config, validate_config, SimConfig};
use vela_ir::{Design, SignalId};

use crate::error::SimError;
use crate::machine::Machine;
use crate::region::Region;
use crate::rom::RomBindings;
use crate::schedule::Schedule;
use crate::scheduler::ActiveRegion;
use crate::settle::CombRegion;
use crate::stats::{RunTotals, StepStats};
use crate::store::SignalStore;
use crate::trigger::{OneShot, RegionTriggers};

/// Where a simulator is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Built, never evaluated.
    Constructed,
    /// Running the static and initial regions of the first evaluation.
    Initial,
    /// Inputs changed, or a step is in progress; outputs are not valid.
    Settling,
    /// The last step converged and outputs are valid.
    SteadyLoop,
    /// The final region ran; the simulator is closed.
    Final,
    /// A fatal error occurred; the simulator is unusable.
    Aborted,
}

/// One independent simulation of a [`Design`].
#[derive(Debug)]
pub struct Simulator {
    config: SimConfig,
    schedule: Schedule,
    machine: Machine,
    statics: RegionTriggers,
    initials: RegionTriggers,
    input_comb: CombRegion,
    settle: CombRegion,
    active: ActiveRegion,
    state: Lifecycle,
    dirty: bool,
    last_step: Option<StepStats>,
    totals: RunTotals,
}

impl Simulator {
    /// Creates a simulator for `design`.
    ///
    /// Every ROM the design declares must be bound in `roms`.
    pub fn new(
        design: Arc<Design>,
        config: SimConfig,
        roms: &RomBindings,
    ) -> Result<Self, SimError> {
        validate_config(&config)?;
        let roms = roms.resolve(&design)?;
        let schedule = Schedule::compile(&design);
        let mut store = SignalStore::new(&design, &config.init);

        let mut statics = RegionTriggers::new(Region::Static);
        if !schedule.statics.is_empty() {
            statics.add_one_shot(OneShot::Static);
        }
        let mut initials = RegionTriggers::new(Region::Initial);
        if !schedule.initials.is_empty() {
            initials.add_one_shot(OneShot::Initial);
        }
        let input_comb = CombRegion::input_comb(
            &mut store,
            &design,
            schedule.input_comb.clone(),
            &schedule.input_comb_watch,
        );
        let settle = CombRegion::settle(
            &mut store,
            &design,
            schedule.settle.clone(),
            &schedule.settle_watch,
            config.kernel.settle_limit,
        );
        let active = ActiveRegion::new(&mut store, &schedule, config.kernel.active_limit);

        debug!(
            signals = store.len(),
            processes = design.processes.len(),
            settle = schedule.settle.len(),
            input_comb = schedule.input_comb.len(),
            domains = schedule.domains.len(),
            "simulator constructed"
        );

        Ok(Self {
            config,
            schedule,
            machine: Machine::new(design, store, roms),
            statics,
            initials,
            input_comb,
            settle,
            active,
            state: Lifecycle::Constructed,
            dirty: false,
            last_step: None,
            totals: RunTotals::default(),
        })
    }

    /// Creates a simulator with the default configuration and no ROMs.
    pub fn with_defaults(design: Arc<Design>) -> Result<Self, SimError> {
        Self::new(design, SimConfig::default(), &RomBindings::new())
    }

    /// Creates a simulator configured from `<dir>/vela.toml`.
    pub fn from_config_dir(
        design: Arc<Design>,
        dir: &Path,
        roms: &RomBindings,
    ) -> Result<Self, SimError> {
        let config = load_config(dir)?;
        Self::new(design, config, roms)
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Returns the simulated design.
    pub fn design(&self) -> &Arc<Design> {
        &self.machine.design
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns the region assignment of the design's processes.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn check_usable(&self) -> Result<(), SimError> {
        let err = match self.state {
            Lifecycle::Aborted => SimError::Aborted,
            Lifecycle::Final => SimError::Finalized,
            _ => return Ok(()),
        };
        warn!(state = ?self.state, "call refused: {err}");
        Err(err)
    }

    fn fail(&mut self, err: SimError) -> SimError {
        if err.is_fatal() {
            self.state = Lifecycle::Aborted;
        }
        err
    }

    /// Drives a primary input.
    ///
    /// A value wider than the input is a fatal [`SimError::WidthViolation`].
    /// Outputs are refused until the next [`evaluate`](Self::evaluate) if
    /// the stored value changed.
    pub fn set_input(&mut self, id: SignalId, value: u64) -> Result<(), SimError> {
        self.check_usable()?;
        let design = &self.machine.design;
        let signal = design
            .signals
            .try_get(id)
            .ok_or_else(|| SimError::UnknownSignal(format!("#{}", id.as_raw())))?;
        let name = design.interner.resolve(signal.name);
        if !signal.is_input() {
            return Err(SimError::NotAnInput {
                signal: name.to_string(),
            });
        }
        let width = signal.width;
        if !Bits::fits(value, width) {
            warn!(signal = name, width, value, "input value too wide");
            let err = SimError::WidthViolation {
                signal: name.to_string(),
                width,
                value,
            };
            return Err(self.fail(err));
        }
        if self.machine.store.set(id, Bits::new(value, width)) {
            self.dirty = true;
            if self.state == Lifecycle::SteadyLoop {
                self.state = Lifecycle::Settling;
            }
        }
        Ok(())
    }

    /// Overwrites an input or a register, as a debugger would.
    ///
    /// The write is picked up by the next [`evaluate`](Self::evaluate) like
    /// an input change: combinational logic reading the signal re-settles
    /// and a clock edge on it fires its domain. Signals driven by
    /// combinational processes are refused with [`SimError::CombDriven`],
    /// since their value is a function of their sources.
    pub fn deposit(&mut self, id: SignalId, value: u64) -> Result<(), SimError> {
        self.check_usable()?;
        let design = &self.machine.design;
        let signal = design
            .signals
            .try_get(id)
            .ok_or_else(|| SimError::UnknownSignal(format!("#{}", id.as_raw())))?;
        if self.schedule.comb_driven.contains(&id) {
            let name = design.interner.resolve(signal.name);
            warn!(signal = name, "deposit refused: combinationally driven");
            return Err(SimError::CombDriven {
                signal: name.to_string(),
            });
        }
        let width = signal.width;
        if !Bits::fits(value, width) {
            let err = SimError::WidthViolation {
                signal: design.interner.resolve(signal.name).to_string(),
                width,
                value,
            };
            return Err(self.fail(err));
        }
        debug!(signal = design.interner.resolve(signal.name), value, "deposit");
        if self.machine.store.set(id, Bits::new(value, width)) {
            self.dirty = true;
            if self.state == Lifecycle::SteadyLoop {
                self.state = Lifecycle::Settling;
            }
        }
        Ok(())
    }

    /// Drives a primary input looked up by name.
    pub fn set_input_by_name(&mut self, name: &str, value: u64) -> Result<(), SimError> {
        self.check_usable()?;
        let id = self.lookup(name)?;
        self.set_input(id, value)
    }

    fn lookup(&self, name: &str) -> Result<SignalId, SimError> {
        self.machine
            .design
            .find_signal(name)
            .ok_or_else(|| SimError::UnknownSignal(name.to_string()))
    }

    /// Advances the design to its next stable state.
    ///
    /// The first call also runs the static and initial regions. Every call
    /// then runs the input-combinational pass, settles combinational logic,
    /// and repeats active/commit iterations while clock domains fire.
    pub fn evaluate(&mut self) -> Result<StepStats, SimError> {
        self.check_usable()?;
        self.machine.stats = StepStats::default();
        if let Err(err) = self.step() {
            return Err(self.fail(err));
        }
        let stats = self.machine.stats;
        self.state = Lifecycle::SteadyLoop;
        self.dirty = false;
        self.last_step = Some(stats);
        self.totals.record(&stats);
        debug!(
            step = self.totals.steps,
            input_comb = stats.input_comb_ran,
            settle_iterations = stats.settle_iterations,
            active_iterations = stats.active_iterations,
            processes = stats.processes_run,
            committed = stats.writes_committed,
            "evaluate complete"
        );
        Ok(stats)
    }

    fn step(&mut self) -> Result<(), SimError> {
        if self.state == Lifecycle::Constructed {
            self.state = Lifecycle::Initial;
            if self.statics.evaluate(&mut self.machine.store).any() {
                self.machine.run_all(&self.schedule.statics);
            }
            if self.initials.evaluate(&mut self.machine.store).any() {
                self.machine.run_all(&self.schedule.initials);
            }
            // Values left by the initial region are the baseline for edge
            // detection; they never count as an edge themselves.
            self.machine.store.seed_edges();
        }
        self.state = Lifecycle::Settling;
        self.machine.stats.input_comb_ran = self.input_comb.run_once(&mut self.machine);
        self.settle.run_to_fixpoint(&mut self.machine)?;
        self.active.run(&mut self.machine, &mut self.settle)?;
        Ok(())
    }

    fn check_ready(&self) -> Result<(), SimError> {
        self.check_usable()?;
        let reason = match self.state {
            Lifecycle::Constructed => "design has not been evaluated yet",
            _ if self.dirty => "inputs changed since the last evaluate",
            _ => return Ok(()),
        };
        warn!(state = ?self.state, "output refused: {reason}");
        Err(SimError::NotReady {
            reason: reason.to_string(),
        })
    }

    /// Reads a signal after a converged step.
    pub fn output(&self, id: SignalId) -> Result<Bits, SimError> {
        self.check_ready()?;
        if !self.machine.design.signals.contains(id) {
            return Err(SimError::UnknownSignal(format!("#{}", id.as_raw())));
        }
        Ok(self.machine.store.get(id))
    }

    /// Reads a signal by name after a converged step.
    pub fn output_by_name(&self, name: &str) -> Result<Bits, SimError> {
        self.check_ready()?;
        self.output(self.lookup(name)?)
    }

    /// Reads any signal without the readiness check.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to the design.
    pub fn peek(&self, id: SignalId) -> Bits {
        self.machine.store.get(id)
    }

    /// Reads any signal by name without the readiness check.
    pub fn peek_by_name(&self, name: &str) -> Option<Bits> {
        self.machine
            .design
            .find_signal(name)
            .map(|id| self.machine.store.get(id))
    }

    /// Runs the final region. Afterwards every call is refused with
    /// [`SimError::Finalized`].
    pub fn finalize(&mut self) -> Result<(), SimError> {
        self.check_usable()?;
        self.machine.run_all(&self.schedule.finals);
        self.state = Lifecycle::Final;
        debug!(finals = self.schedule.finals.len(), "simulator finalized");
        Ok(())
    }

    /// Lines produced by `Display` statements so far.
    pub fn display_output(&self) -> &[String] {
        &self.machine.display
    }

    /// Takes the collected `Display` lines, leaving the buffer empty.
    pub fn take_display_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.machine.display)
    }

    /// Counters of the most recent successful step.
    pub fn last_step(&self) -> Option<StepStats> {
        self.last_step
    }

    /// Counters accumulated over every successful step.
    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    /// Number of successful steps.
    pub fn steps(&self) -> u64 {
        self.totals.steps
    }
}
