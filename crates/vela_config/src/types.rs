//! Configuration types deserialized from `vela.toml`.

use serde::Deserialize;

/// Iteration cap used for both loops when the file does not set one.
pub const DEFAULT_LIMIT: u32 = 100;

/// The top-level kernel configuration parsed from `vela.toml`.
///
/// Every section is optional; an empty file yields [`SimConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimConfig {
    /// Scheduler loop limits.
    #[serde(default)]
    pub kernel: KernelConfig,
    /// How signals without an explicit initial value start out.
    #[serde(default)]
    pub init: InitConfig,
}

/// Bounds on the kernel's fixed-point loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KernelConfig {
    /// Maximum settle iterations per settle loop before reporting
    /// non-convergence.
    #[serde(default = "default_limit")]
    pub settle_limit: u32,
    /// Maximum active/commit rounds per step before reporting
    /// non-convergence.
    #[serde(default = "default_limit")]
    pub active_limit: u32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            settle_limit: DEFAULT_LIMIT,
            active_limit: DEFAULT_LIMIT,
        }
    }
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Initial-value settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct InitConfig {
    /// The fill policy.
    #[serde(default)]
    pub policy: InitPolicy,
    /// Seed for [`InitPolicy::Random`]; the same seed gives the same values.
    #[serde(default)]
    pub seed: u64,
}

/// Fill policy for signals declared without an initial value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitPolicy {
    /// Every bit 0 (default).
    #[default]
    Zero,
    /// Every bit 1.
    Ones,
    /// Pseudo-random bits from the configured seed.
    Random,
}
