//! # Node Configuration
//!
//! Runtime parameters for the mining node, loaded from defaults and
//! overridden by environment variables.
//!
//! | Variable               | Field                         | Default        |
//! |------------------------|-------------------------------|----------------|
//! | `QC_MINING_THREADS`    | `mining.threads`              | logical CPUs   |
//! | `QC_MINING_DIFFICULTY` | `difficulty`                  | 1000           |
//! | `QC_RANDOM_NONCE`      | `mining.randomize_start_nonce`| `false`        |
//! | `QC_MAX_BLOCKS`        | `max_blocks` (0 = unbounded)  | 0              |
//! | `QC_OBSERVER`          | `observer`                    | `true`         |

use std::str::FromStr;

use qc_17_block_production::MinerConfig;
use shared_types::entities::Difficulty;
use thiserror::Error;
use tracing::info;

/// Default difficulty: roughly a thousand hashes per block.
pub const DEFAULT_DIFFICULTY: Difficulty = 1000;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Miner worker pool configuration.
    pub mining: MinerConfig,
    /// Difficulty every mined block must satisfy.
    pub difficulty: Difficulty,
    /// Stop after this many blocks. Zero mines until shutdown.
    pub max_blocks: u64,
    /// Run the logging chain observer.
    pub observer: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            mining: MinerConfig::default(),
            difficulty: DEFAULT_DIFFICULTY,
            max_blocks: 0,
            observer: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} for {variable}")]
    InvalidValue {
        /// Environment variable name.
        variable: &'static str,
        /// Raw value found.
        value: String,
    },

    /// Mining needs at least one worker thread.
    #[error("Mining thread count must be at least 1")]
    ZeroThreads,

    /// Difficulty zero is meaningless.
    #[error("Mining difficulty must be at least 1")]
    ZeroDifficulty,
}

impl NodeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| std::env::var(variable).ok())
    }

    /// Load configuration from defaults overridden by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(threads) = parse_var(&lookup, "QC_MINING_THREADS")? {
            config.mining.threads = threads;
        }
        if let Some(difficulty) = parse_var(&lookup, "QC_MINING_DIFFICULTY")? {
            config.difficulty = difficulty;
        }
        if let Some(randomize) = parse_flag(&lookup, "QC_RANDOM_NONCE")? {
            config.mining.randomize_start_nonce = randomize;
        }
        if let Some(max_blocks) = parse_var(&lookup, "QC_MAX_BLOCKS")? {
            config.max_blocks = max_blocks;
        }
        if let Some(observer) = parse_flag(&lookup, "QC_OBSERVER")? {
            config.observer = observer;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the miner cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mining.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.difficulty == 0 {
            return Err(ConfigError::ZeroDifficulty);
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, variable: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(variable) else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            variable,
            value: raw.clone(),
        })?;
    info!(variable, value = %raw.trim(), "Loaded override from environment");
    Ok(Some(value))
}

fn parse_flag<F>(lookup: &F, variable: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(variable) else {
        return Ok(None);
    };
    let value = match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            return Err(ConfigError::InvalidValue {
                variable,
                value: raw,
            })
        }
    };
    Ok(Some(value))
}
