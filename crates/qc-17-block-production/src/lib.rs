//! # Quantum Chain - Block Production Engine (Subsystem 17)
//!
//! **Bounded Context:** Proof-of-work mining
//!
//! ## Purpose
//!
//! Races N worker threads over disjoint nonce sequences until one of them
//! finds a block hash that satisfies the difficulty target, or until the
//! search is stopped from outside.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service                                            │
//! │  - BlockProducer: mine on the blocking pool,        │
//! │    publish NewBlock to the shared bus               │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Miner: worker pool + atomic state machine        │
//! │  - ProofOfWork: hash + difficulty predicate         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Single Winner**: only the first `InProgress → BlockFound` transition
//!    records a block
//! 2. **Disjoint Search**: worker `i` tries `nonce + i + k * threads`
//! 3. **No Dangling Work**: every worker is joined before `mine` returns
//! 4. **Never Left Running**: state is not `InProgress` after `mine` returns
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let miner = Miner::new(Sha256dProofOfWork);
//! let block = miner.mine(BlockMiningParameters { block_template, difficulty }, 4)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Mining engine
pub mod domain;
/// Async service that publishes found blocks
pub mod service;
/// Hashing helpers
pub mod utils;

mod config;
mod error;
mod metrics;

pub use config::MinerConfig;
pub use error::{BlockProductionError, MinerError, Result};
pub use metrics::MiningMetrics;

pub use domain::{
    check_hash, AtomicMiningState, BlockMiningParameters, CompletionSignal, HashError, Miner,
    MiningState, ProofOfWork, Sha256dProofOfWork,
};

pub use service::BlockProducer;

/// Subsystem identifier
pub const SUBSYSTEM_ID: u8 = 17;
