//! Utility modules for block production

pub mod hashing;

pub use hashing::{block_hash, hashing_blob, sha256, sha256d};
