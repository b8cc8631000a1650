//! # Quantum-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── mining_benchmarks.rs  # Hashing, mining and fan-out throughput
//! │
//! └── src/integration/
//!     ├── mining_flow.rs        # Miner → producer → bus → subscribers
//!     └── message_fanout.rs     # Queue, registry and broadcast properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By category
//! cargo test -p qc-tests integration::mining_flow
//! cargo test -p qc-tests integration::message_fanout
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod integration;
