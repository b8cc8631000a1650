//! Canonical block serialization and the digests built on it.
//!
//! Provides the canonical header serialization and the SHA-256 helpers the
//! default proof-of-work and the block id are built on.

use sha2::{Digest, Sha256};
use shared_types::entities::{Block, Hash};

/// Single SHA-256 digest
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// SHA-256 applied twice
pub fn sha256d(data: &[u8]) -> Hash {
    Sha256::digest(Sha256::digest(data)).into()
}

/// Serialize a block for hashing
///
/// Header fields little-endian, followed by the transaction count and the
/// transaction hashes in order.
pub fn hashing_blob(block: &Block) -> Vec<u8> {
    let header = &block.header;
    let mut bytes = Vec::with_capacity(64 + 32 * block.transaction_hashes.len());

    bytes.push(header.major_version);
    bytes.push(header.minor_version);
    bytes.extend_from_slice(&header.height.to_le_bytes());
    bytes.extend_from_slice(&header.timestamp.to_le_bytes());
    bytes.extend_from_slice(&header.previous_block_hash);
    bytes.extend_from_slice(&header.nonce.to_le_bytes());
    bytes.extend_from_slice(&(block.transaction_hashes.len() as u64).to_le_bytes());
    for tx_hash in &block.transaction_hashes {
        bytes.extend_from_slice(tx_hash);
    }

    bytes
}

/// Block id: double SHA-256 of the hashing blob
pub fn block_hash(block: &Block) -> Hash {
    sha256d(&hashing_blob(block))
}
