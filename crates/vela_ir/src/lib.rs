//! VelaIR: the elaborated signal network consumed by the simulation kernel.
//!
//! A [`Design`] is a flat table of fixed-width [`Signal`]s, behavioral
//! [`Process`]es tagged with the scheduling region they belong to, and
//! declarations of external read-only [`RomDecl`] tables. Designs are put
//! together with a [`DesignBuilder`], which validates the network before
//! handing it to the kernel.

#![warn(missing_docs)]

pub mod arena;
pub mod builder;
pub mod deps;
pub mod design;
pub mod error;
pub mod expr;
pub mod ids;
pub mod process;
pub mod rom;
pub mod signal;
pub mod stmt;

pub use arena::{Arena, ArenaId};
pub use builder::DesignBuilder;
pub use deps::{settle_order, SettleOrder};
pub use design::Design;
pub use error::DesignError;
pub use expr::{BinaryOp, Expr, UnaryOp};
pub use ids::{ProcessId, RomId, SignalId};
pub use process::{describe_sensitivity, Edge, EdgeSensitivity, Process, ProcessKind};
pub use rom::RomDecl;
pub use signal::{Signal, SignalKind};
pub use stmt::{CaseArm, LValue, Statement};
