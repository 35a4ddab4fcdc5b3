//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SimConfig;
use std::path::Path;

/// Name of the configuration file looked up by [`load_config`].
pub const CONFIG_FILE: &str = "vela.toml";

/// Loads and validates a `vela.toml` configuration from a directory.
///
/// Reads `<dir>/vela.toml`, parses it, and validates the loop limits.
pub fn load_config(dir: &Path) -> Result<SimConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `vela.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that both loop caps allow at least one iteration.
pub fn validate_config(config: &SimConfig) -> Result<(), ConfigError> {
    if config.kernel.settle_limit == 0 {
        return Err(ConfigError::ValidationError(
            "kernel.settle_limit must be at least 1".to_string(),
        ));
    }
    if config.kernel.active_limit == 0 {
        return Err(ConfigError::ValidationError(
            "kernel.active_limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
