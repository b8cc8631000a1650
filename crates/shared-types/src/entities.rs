//! # Core Domain Entities
//!
//! Blocks, hashes and difficulty as seen by the concurrency core. Template
//! construction and difficulty derivation happen elsewhere; here they are
//! plain data.

use serde::{Deserialize, Serialize};

/// A 32-byte hash (block id, transaction id, proof-of-work result).
pub type Hash = [u8; 32];

/// Proof-of-work difficulty target. Higher is harder.
pub type Difficulty = u64;

/// The all-zero hash, used as the parent of a genesis template.
pub const NULL_HASH: Hash = [0u8; 32];

/// Header of a block template. `nonce` is the only field the miner varies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Major protocol version.
    pub major_version: u8,
    /// Minor protocol version.
    pub minor_version: u8,
    /// Height the block will occupy once accepted.
    pub height: u64,
    /// Unix timestamp of template creation.
    pub timestamp: u64,
    /// Hash of the block this template builds on.
    pub previous_block_hash: Hash,
    /// Proof-of-work nonce.
    pub nonce: u32,
}

/// A block template plus the transactions it commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Block {
    /// The header, including the nonce.
    pub header: BlockHeader,
    /// Hashes of the transactions included in this block.
    pub transaction_hashes: Vec<Hash>,
}

impl Block {
    /// Create a template on top of `previous_block_hash`.
    pub fn new(height: u64, timestamp: u64, previous_block_hash: Hash) -> Self {
        Self {
            header: BlockHeader {
                major_version: 1,
                minor_version: 0,
                height,
                timestamp,
                previous_block_hash,
                nonce: 0,
            },
            transaction_hashes: Vec::new(),
        }
    }

    /// Current nonce.
    pub fn nonce(&self) -> u32 {
        self.header.nonce
    }

    /// Advance the nonce by `step`, wrapping at `u32::MAX`.
    pub fn advance_nonce(&mut self, step: u32) {
        self.header.nonce = self.header.nonce.wrapping_add(step);
    }
}

/// Hex rendering of the first 8 bytes of a hash, for log lines.
pub fn short_hash(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}
