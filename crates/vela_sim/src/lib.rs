//! Cycle-accurate evaluation kernel for synchronous designs.
//!
//! This crate executes a validated [`Design`](vela_ir::Design) the way a
//! Verilator-style model does: with no notion of time, only a sequence of
//! `evaluate()` steps. Each step runs scheduling regions in a fixed order:
//!
//! 1. Input-combinational logic, when a primary input it reads changed.
//! 2. The settle loop, repeating combinational logic to a fixed point.
//! 3. Active/commit iterations: clocked processes of every fired clock
//!    domain compute next state into a delayed-write queue, the queue is
//!    committed at once, and the settle loop re-runs. This repeats while
//!    commits produce new edges.
//!
//! Both loops are bounded; exceeding a cap is a fatal
//! [`SimError::NonConvergence`].
//!
//! # Usage
//!
//! ```ignore
//! use vela_sim::Simulator;
//!
//! let mut sim = Simulator::with_defaults(design)?;
//! sim.set_input_by_name("clk", 1)?;
//! sim.evaluate()?;
//! let q = sim.output_by_name("q")?;
//! ```
//!
//! # Modules
//!
//! - `store`: signal values and edge references
//! - `trigger`: per-region trigger tables
//! - `nba`: the delayed-write queue
//! - `eval`: expression evaluation and statement execution
//! - `schedule`: static region assignment of processes
//! - `simulator`: the lifecycle driver

#![warn(missing_docs)]

pub mod error;
pub mod eval;
mod machine;
pub mod nba;
pub mod region;
pub mod rom;
pub mod schedule;
mod scheduler;
mod settle;
pub mod simulator;
pub mod stats;
pub mod store;
pub mod trigger;

pub use error::SimError;
pub use nba::{CommitSummary, NbaQueue, PendingWrite};
pub use region::Region;
pub use rom::{RomBindings, RomSet, RomTable, SharedRom};
pub use schedule::{ClockDomain, Schedule};
pub use simulator::{Lifecycle, Simulator};
pub use stats::{RunTotals, StepStats};
pub use store::{EdgeSlot, SignalStore, Transition};
pub use trigger::{OneShot, RegionTriggers, TriggerSet};
