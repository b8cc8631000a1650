//! Domain layer - the mining engine
//!
//! Pure search logic with no async and no I/O. Worker threads are the only
//! concurrency; they coordinate through a single atomic state cell.
//!
//! ## Components
//!
//! - [`Miner`]: spawns workers, resolves the race, joins everything
//! - [`AtomicMiningState`]: Stopped / InProgress / BlockFound cell
//! - [`CompletionSignal`]: lets `stop()` wait for workers to exit
//! - [`ProofOfWork`]: hash function and difficulty predicate

pub mod miner;
pub mod pow;
pub mod signal;
pub mod state;

pub use miner::{BlockMiningParameters, Miner};
pub use pow::{check_hash, HashError, ProofOfWork, Sha256dProofOfWork};
pub use signal::CompletionSignal;
pub use state::{AtomicMiningState, MiningState};
