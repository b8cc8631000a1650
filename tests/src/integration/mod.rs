//! # Integration Tests
//!
//! Cross-crate flows through the shared bus.

mod message_fanout;
