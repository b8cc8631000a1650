//! # Node Runtime Library
//!
//! Wiring for the mining node: configuration, the runtime that connects the
//! block producer to the event bus, and the chain observer. The main entry
//! point is the `main.rs` binary.

#![warn(missing_docs)]

pub mod config;
pub mod observer;
pub mod runtime;

pub use config::{ConfigError, NodeConfig};
pub use observer::observe_chain;
pub use runtime::{EventBus, NodeRuntime};
