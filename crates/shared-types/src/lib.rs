//! # Shared Types Crate
//!
//! Domain entities consumed by both the mining engine and the subscriber
//! message bus.
//!
//! ## Design Principles
//!
//! - **Opaque to the core**: the miner only ever touches a block's nonce;
//!   every other header field is carried through untouched.
//! - **Plain values**: all entities are `Clone` so each mining worker can own
//!   a private copy of the template.

pub mod entities;

pub use entities::*;
