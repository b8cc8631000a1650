//! # Message Bus
//!
//! Fan-out of published messages into every registered subscriber queue.
//!
//! The registry and the broadcast share one lock, so a queue is never
//! registered or removed halfway through a publish. Pushing into a queue
//! never blocks, so holding the lock across the broadcast cannot stall on a
//! slow consumer.

use crate::intrusive_list::IntrusiveLinkedList;
use crate::message_queue::{MessageQueue, MessageQueueGuard, MessageQueueOwner};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Trait for publishing messages to subscriber queues.
pub trait MessagePublisher<M>: Send + Sync {
    /// Push a copy of `message` into every registered queue.
    ///
    /// Returns the number of queues that accepted it.
    fn publish(&self, message: M) -> usize;

    /// Stop every registered queue, waking all blocked consumers.
    fn interrupt(&self);

    /// Total number of `publish` calls.
    fn messages_published(&self) -> u64;
}

/// In-process broadcast registry of [`MessageQueue`]s.
pub struct MessageBus<M> {
    /// Registered queues, in registration order.
    queues: Mutex<IntrusiveLinkedList<MessageQueue<M>>>,

    /// Total messages published.
    messages_published: AtomicU64,
}

impl<M> MessageBus<M> {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(IntrusiveLinkedList::new()),
            messages_published: AtomicU64::new(0),
        }
    }

    /// Create a fresh queue registered for the lifetime of the returned guard.
    #[must_use]
    pub fn subscribe(self: &Arc<Self>) -> MessageQueueGuard<Self, M> {
        MessageQueueGuard::new(Arc::clone(self), Arc::new(MessageQueue::new()))
    }

    /// Number of registered queues.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.queues.lock().len()
    }

    /// Whether `queue` is currently registered.
    #[must_use]
    pub fn is_subscribed(&self, queue: &Arc<MessageQueue<M>>) -> bool {
        self.queues.lock().contains(queue)
    }
}

impl<M> Default for MessageBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MessageQueueOwner<M> for MessageBus<M> {
    fn add_message_queue(&self, queue: &Arc<MessageQueue<M>>) -> bool {
        let mut queues = self.queues.lock();
        let added = queues.insert(queue);
        debug!(added, subscribers = queues.len(), "Message queue registration");
        added
    }

    fn remove_message_queue(&self, queue: &Arc<MessageQueue<M>>) -> bool {
        let mut queues = self.queues.lock();
        let removed = queues.remove(queue);
        debug!(removed, subscribers = queues.len(), "Message queue deregistration");
        removed
    }
}

impl<M: Clone + Send> MessagePublisher<M> for MessageBus<M> {
    fn publish(&self, message: M) -> usize {
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        let queues = self.queues.lock();
        let delivered = queues
            .iter()
            .filter(|queue| queue.push(message.clone()))
            .count();

        debug!(
            subscribers = queues.len(),
            delivered, "Message published"
        );
        delivered
    }

    fn interrupt(&self) {
        let queues = self.queues.lock();
        for queue in queues.iter() {
            queue.stop();
        }
        debug!(subscribers = queues.len(), "Subscriber queues interrupted");
    }

    fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }
}
