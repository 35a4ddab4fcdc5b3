//! Scheduling regions.

use serde::Serialize;
use std::fmt;

/// A scheduling phase with its own read/write contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    /// Construction-time processes, run once.
    Static,
    /// `initial` blocks, run once before the first settle.
    Initial,
    /// The combinational fixed-point loop.
    Settle,
    /// Combinational logic that reads only primary inputs.
    InputComb,
    /// Clocked logic computing next state into the delayed-write queue.
    Active,
    /// Application of the delayed-write queue.
    NonBlockingAssign,
    /// `final` blocks, run once at teardown.
    Final,
}

impl Region {
    /// Short name used in trigger descriptions and logs.
    pub fn name(self) -> &'static str {
        match self {
            Region::Static => "static",
            Region::Initial => "initial",
            Region::Settle => "stl",
            Region::InputComb => "ico",
            Region::Active => "act",
            Region::NonBlockingAssign => "nba",
            Region::Final => "final",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
