//! # Shared Bus - Subscriber Message Queues
//!
//! Fans blockchain events out to any number of independent consumers.
//!
//! ```text
//!                 publish()
//!   Publisher ──────────────┐
//!                           ▼
//!                   ┌──────────────┐
//!                   │  MessageBus  │  registry of queues
//!                   └──────────────┘
//!                    │     │     │   one copy per queue
//!                    ▼     ▼     ▼
//!                  [q1]  [q2]  [q3]  front() / pop()
//!                    │     │     │
//!                    ▼     ▼     ▼
//!                 consumer tasks, each at its own pace
//! ```
//!
//! ## Guarantees
//!
//! - Every registered queue sees every message exactly once, in publish order.
//! - A slow consumer never blocks the publisher or other consumers.
//! - `interrupt()` wakes every blocked consumer with
//!   [`QueueError::Interrupted`].
//! - Registration is scoped: a [`MessageQueueGuard`] removes its queue from
//!   the registry when dropped.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod intrusive_list;
pub mod message_queue;
pub mod publisher;

// Re-export main types
pub use events::{BlockchainMessage, DeleteTransactionReason, MessageType};
pub use intrusive_list::IntrusiveLinkedList;
pub use message_queue::{MessageQueue, MessageQueueGuard, MessageQueueOwner, QueueError};
pub use publisher::{MessageBus, MessagePublisher};
