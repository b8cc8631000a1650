//! Configuration types for block production

use serde::Deserialize;

/// Mining engine configuration
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MinerConfig {
    /// Number of mining threads (default: num_cpus)
    pub threads: usize,

    /// Replace the template nonce with a random one before striding
    pub randomize_start_nonce: bool,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get().max(1),
            randomize_start_nonce: false,
        }
    }
}
