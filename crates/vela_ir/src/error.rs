//! Errors reported while assembling and validating a design.

/// A structural defect found by [`DesignBuilder`](crate::builder::DesignBuilder).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DesignError {
    /// A signal was declared with a width outside 1..=64.
    #[error("signal '{name}' has unsupported width {width} (must be 1 to 64)")]
    InvalidWidth {
        /// The signal name.
        name: String,
        /// The requested width.
        width: u32,
    },

    /// Two signals or two ROMs share a name.
    #[error("duplicate declaration of '{0}'")]
    Duplicate(String),

    /// An initial value does not fit in the signal's width.
    #[error("initial value {value:#x} does not fit in {width}-bit signal '{name}'")]
    InitTooWide {
        /// The signal name.
        name: String,
        /// The signal width.
        width: u32,
        /// The rejected value.
        value: u64,
    },

    /// A part-select lies outside its operand.
    #[error("slice [{high}:{low}] out of range for {width}-bit operand in {process}")]
    SliceOutOfRange {
        /// The process containing the slice.
        process: String,
        /// High bit.
        high: u32,
        /// Low bit.
        low: u32,
        /// Width of the sliced operand.
        width: u32,
    },

    /// A concatenation is empty or wider than 64 bits.
    #[error("concatenation of {width} bits in {process} is not 1 to 64 bits wide")]
    InvalidConcat {
        /// The process containing the concatenation.
        process: String,
        /// The total width.
        width: u32,
    },

    /// A non-blocking assignment appears outside a clocked process.
    #[error("non-blocking assignment outside a clocked process in {process}")]
    NonBlockingOutsideClocked {
        /// The offending process.
        process: String,
    },

    /// A blocking assignment appears inside a clocked process.
    #[error("blocking assignment inside clocked process {process}")]
    BlockingInClocked {
        /// The offending process.
        process: String,
    },

    /// A final process assigns a signal.
    #[error("final process {process} must not assign signals")]
    AssignInFinal {
        /// The offending process.
        process: String,
    },

    /// A process assigns a primary input.
    #[error("{process} assigns primary input '{signal}'")]
    AssignToInput {
        /// The offending process.
        process: String,
        /// The input name.
        signal: String,
    },

    /// A signal is driven by both combinational and clocked logic.
    #[error("signal '{0}' is driven by both combinational and clocked processes")]
    MixedDrivers(String),

    /// Two combinational processes drive the same signal.
    #[error("signal '{signal}' is driven by both {first} and {second}")]
    MultipleDrivers {
        /// The signal name.
        signal: String,
        /// The earlier driver.
        first: String,
        /// The later driver.
        second: String,
    },

    /// A clocked process has no edges to wake it up.
    #[error("clocked process {process} has an empty sensitivity list")]
    EmptySensitivity {
        /// The offending process.
        process: String,
    },

    /// A reference to a signal id not declared in this design.
    #[error("reference to undeclared signal #{0}")]
    UnknownSignal(u32),

    /// A reference to a ROM id not declared in this design.
    #[error("reference to undeclared ROM #{0}")]
    UnknownRom(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_width() {
        let err = DesignError::InvalidWidth {
            name: "bus".to_string(),
            width: 65,
        };
        assert_eq!(
            format!("{err}"),
            "signal 'bus' has unsupported width 65 (must be 1 to 64)"
        );
    }

    #[test]
    fn display_mixed_drivers() {
        let err = DesignError::MixedDrivers("q".to_string());
        assert_eq!(
            format!("{err}"),
            "signal 'q' is driven by both combinational and clocked processes"
        );
    }

    #[test]
    fn display_slice() {
        let err = DesignError::SliceOutOfRange {
            process: "process 'p'".to_string(),
            high: 9,
            low: 0,
            width: 8,
        };
        assert_eq!(
            format!("{err}"),
            "slice [9:0] out of range for 8-bit operand in process 'p'"
        );
    }
}
