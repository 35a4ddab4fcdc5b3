//! Signal declarations.

use crate::ids::SignalId;
use serde::{Deserialize, Serialize};
use vela_common::Ident;

/// Where a signal sits relative to the design boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// A primary input, written only by the external driver.
    Input,
    /// A primary output, read by the external driver after a step commits.
    Output,
    /// Internal state or a combinational net.
    Internal,
}

/// A named, fixed-width bit vector in the design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The id of this signal in the design's signal table.
    pub id: SignalId,
    /// Debug name, hierarchical with `.` separators.
    pub name: Ident,
    /// Width in bits, 1 to 64.
    pub width: u32,
    /// Boundary role.
    pub kind: SignalKind,
    /// Construction-time value. Signals without one follow the kernel's
    /// initial-value policy.
    pub init: Option<u64>,
}

impl Signal {
    /// Returns `true` for primary inputs.
    pub fn is_input(&self) -> bool {
        self.kind == SignalKind::Input
    }

    /// Returns `true` for primary outputs.
    pub fn is_output(&self) -> bool {
        self.kind == SignalKind::Output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_predicates() {
        let sig = Signal {
            id: SignalId::from_raw(0),
            name: Ident::from_raw(0),
            width: 1,
            kind: SignalKind::Input,
            init: None,
        };
        assert!(sig.is_input());
        assert!(!sig.is_output());
    }

    #[test]
    fn serde_roundtrip() {
        let sig = Signal {
            id: SignalId::from_raw(3),
            name: Ident::from_raw(1),
            width: 10,
            kind: SignalKind::Internal,
            init: Some(5),
        };
        let json = serde_json::to_string(&sig).unwrap();
        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width, 10);
        assert_eq!(back.init, Some(5));
        assert_eq!(back.kind, SignalKind::Internal);
    }
}
