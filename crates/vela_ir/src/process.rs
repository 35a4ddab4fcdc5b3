//! Process definitions and their scheduling regions.
//!
//! A [`Process`] is one behavioral block. Its [`ProcessKind`] decides the
//! region the kernel runs it in and, for clocked processes, the edges that
//! wake it up.

use crate::design::Design;
use crate::ids::{ProcessId, SignalId};
use crate::stmt::Statement;
use serde::{Deserialize, Serialize};
use vela_common::Ident;

/// A clock/reset edge type, detected on the signal's least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// Rising edge (0→1).
    Posedge,
    /// Falling edge (1→0).
    Negedge,
    /// Both edges.
    Both,
}

impl Edge {
    /// Returns `true` if a transition from `old` to `new` matches this edge.
    pub fn matches(self, old: bool, new: bool) -> bool {
        match self {
            Edge::Posedge => !old && new,
            Edge::Negedge => old && !new,
            Edge::Both => old != new,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Edge::Posedge => "posedge",
            Edge::Negedge => "negedge",
            Edge::Both => "edge",
        }
    }
}

/// A signal with its associated edge in a sensitivity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeSensitivity {
    /// The signal being monitored.
    pub signal: SignalId,
    /// The edge to trigger on.
    pub edge: Edge,
}

impl EdgeSensitivity {
    /// `posedge signal`.
    pub fn posedge(signal: SignalId) -> Self {
        Self {
            signal,
            edge: Edge::Posedge,
        }
    }

    /// `negedge signal`.
    pub fn negedge(signal: SignalId) -> Self {
        Self {
            signal,
            edge: Edge::Negedge,
        }
    }
}

/// The kind of process, determining the region it runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessKind {
    /// Runs once at construction time, before anything else.
    Static,
    /// Runs once on the first evaluation (`initial`).
    Initial,
    /// Unclocked logic, re-run until the network settles.
    Combinational,
    /// Edge-triggered logic writing through the delayed-write queue.
    Clocked(Vec<EdgeSensitivity>),
    /// Runs once at teardown (`final`); may only display.
    Final,
}

/// A behavioral process in the design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// The id of this process; also its declaration order.
    pub id: ProcessId,
    /// An optional process label.
    pub name: Option<Ident>,
    /// The kind of process.
    pub kind: ProcessKind,
    /// The process body.
    pub body: Statement,
}

impl Process {
    /// Returns the sensitivity list for clocked processes.
    pub fn sensitivity(&self) -> Option<&[EdgeSensitivity]> {
        match &self.kind {
            ProcessKind::Clocked(list) => Some(list),
            _ => None,
        }
    }
}

/// Formats a sensitivity list the way Verilog spells it, for example
/// `@(posedge clk or negedge reset)`.
pub fn describe_sensitivity(design: &Design, list: &[EdgeSensitivity]) -> String {
    let parts: Vec<String> = list
        .iter()
        .map(|s| format!("{} {}", s.edge.keyword(), design.signal_name(s.signal)))
        .collect();
    format!("@({})", parts.join(" or "))
}
