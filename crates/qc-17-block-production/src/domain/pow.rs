//! Proof-of-work collaborator contract
//!
//! The miner treats hashing and the difficulty comparison as a black box:
//! a [`ProofOfWork`] either hashes a candidate block or reports a
//! [`HashError`], and decides whether a hash satisfies a difficulty.

use crate::utils::hashing::{hashing_blob, sha256d};
use primitive_types::U256;
use shared_types::entities::{Block, Difficulty, Hash};
use thiserror::Error;

/// Failure to compute a candidate hash.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The hashing backend could not produce a result.
    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),
}

/// Hash function plus hash-to-difficulty predicate.
///
/// Implementations must be callable from many worker threads at once.
pub trait ProofOfWork: Send + Sync {
    /// Hash a candidate block. Deterministic for a given block.
    fn hash(&self, block: &Block) -> Result<Hash, HashError>;

    /// Whether `hash` satisfies `difficulty`.
    fn check(&self, hash: &Hash, difficulty: Difficulty) -> bool {
        check_hash(hash, difficulty)
    }
}

/// Difficulty predicate: the hash, read as a little-endian 256-bit integer,
/// times the difficulty must not overflow 2^256.
///
/// Difficulty 0 and 1 accept every hash.
pub fn check_hash(hash: &Hash, difficulty: Difficulty) -> bool {
    U256::from_little_endian(hash)
        .checked_mul(U256::from(difficulty))
        .is_some()
}

/// Double SHA-256 over the canonical hashing blob.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256dProofOfWork;

impl ProofOfWork for Sha256dProofOfWork {
    fn hash(&self, block: &Block) -> Result<Hash, HashError> {
        Ok(sha256d(&hashing_blob(block)))
    }
}
