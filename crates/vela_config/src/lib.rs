//! Parsing and validation of `vela.toml` kernel configuration files.
//!
//! This crate reads the optional configuration file next to a simulation and
//! produces a strongly-typed [`SimConfig`]: the iteration caps of the settle
//! and active loops and the policy used to initialise signals that have no
//! construction-time value.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, validate_config, CONFIG_FILE};
pub use types::*;
