//! Kernel error types.
//!
//! Every error that construction or evaluation can raise is a variant of
//! [`SimError`]. Non-convergence and width violations are fatal: after one
//! is returned the simulator refuses all further work.

use vela_config::ConfigError;
use vela_ir::DesignError;

use crate::region::Region;

/// Errors that can occur during simulator setup or evaluation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A region kept re-triggering past its iteration cap.
    #[error("{region} region did not converge after {iterations} iterations (limit {limit}):\n{active}")]
    NonConvergence {
        /// The region that failed to converge.
        region: Region,
        /// Iterations performed before giving up.
        iterations: u32,
        /// The configured cap.
        limit: u32,
        /// Description of the triggers still active.
        active: String,
    },

    /// An input was driven with a value wider than its declared width.
    #[error("value {value:#x} does not fit {width}-bit signal '{signal}'")]
    WidthViolation {
        /// The signal name.
        signal: String,
        /// Its declared width.
        width: u32,
        /// The rejected value.
        value: u64,
    },

    /// Outputs were read before the design settled.
    #[error("outputs not ready: {reason}")]
    NotReady {
        /// Why the outputs cannot be read yet.
        reason: String,
    },

    /// `set_input` was called on a signal that is not a primary input.
    #[error("signal '{signal}' is not a primary input")]
    NotAnInput {
        /// The signal name.
        signal: String,
    },

    /// `deposit` targeted a signal that combinational logic recomputes.
    #[error("signal '{signal}' is driven by combinational logic and cannot be deposited")]
    CombDriven {
        /// The signal name.
        signal: String,
    },

    /// A signal name did not resolve.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// The final region already ran.
    #[error("simulator already finalized")]
    Finalized,

    /// A previous fatal error stopped the simulator.
    #[error("simulator aborted by an earlier fatal error")]
    Aborted,

    /// The design declares a ROM the host did not bind.
    #[error("no table bound for ROM '{0}'")]
    MissingRom(String),

    /// The design failed validation.
    #[error(transparent)]
    Design(#[from] DesignError),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SimError {
    /// Returns `true` for errors that abort the simulator.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SimError::NonConvergence { .. } | SimError::WidthViolation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_convergence_display() {
        let err = SimError::NonConvergence {
            region: Region::Settle,
            iterations: 100,
            limit: 100,
            active: "No triggers active".into(),
        };
        assert_eq!(
            err.to_string(),
            "stl region did not converge after 100 iterations (limit 100):\nNo triggers active"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn width_violation_display() {
        let err = SimError::WidthViolation {
            signal: "b2".into(),
            width: 1,
            value: 2,
        };
        assert_eq!(err.to_string(), "value 0x2 does not fit 1-bit signal 'b2'");
        assert!(err.is_fatal());
    }

    #[test]
    fn refusals_are_not_fatal() {
        let err = SimError::NotReady {
            reason: "inputs changed".into(),
        };
        assert_eq!(err.to_string(), "outputs not ready: inputs changed");
        assert!(!err.is_fatal());
        assert!(!SimError::Finalized.is_fatal());
        assert!(!SimError::MissingRom("font".into()).is_fatal());
        let err = SimError::CombDriven {
            signal: "pix_x".into(),
        };
        assert_eq!(
            err.to_string(),
            "signal 'pix_x' is driven by combinational logic and cannot be deposited"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn design_error_converts() {
        let err: SimError = DesignError::Duplicate("clk".into()).into();
        assert!(matches!(err, SimError::Design(DesignError::Duplicate(_))));
    }
}
