//! # Subscriber Message Queue
//!
//! A per-subscriber FIFO with blocking reads and an interrupt flag.
//!
//! Each consumer owns exactly one queue. Producers never block: `push`
//! appends and wakes the waiting consumer. The consumer suspends in
//! [`MessageQueue::front`] or [`MessageQueue::pop`] until a message arrives
//! or the queue is stopped.
//!
//! ## Stop semantics
//!
//! - `stop()` wakes the blocked consumer; its call fails with
//!   [`QueueError::Interrupted`].
//! - Messages queued before `stop()` are still readable. Once the queue is
//!   stopped *and* empty, every read fails immediately.
//! - `push()` on a stopped queue drops the message.
//!
//! ## Registration
//!
//! Queues receive broadcasts only while registered with an owner. Use
//! [`MessageQueueGuard`] so registration is tied to a scope.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Deref;
use std::pin::pin;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{debug, trace, warn};

/// Errors from blocking queue operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was stopped and holds no more messages.
    #[error("Message queue interrupted")]
    Interrupted,
}

struct QueueInner<M> {
    messages: VecDeque<M>,
    stopped: bool,
}

/// Single-consumer blocking FIFO.
pub struct MessageQueue<M> {
    inner: Mutex<QueueInner<M>>,
    available: Notify,
}

impl<M> MessageQueue<M> {
    /// Create an empty, running queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                messages: VecDeque::new(),
                stopped: false,
            }),
            available: Notify::new(),
        }
    }

    /// Append a message and wake the consumer.
    ///
    /// Returns `false` if the queue is stopped; the message is dropped.
    pub fn push(&self, message: M) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.stopped {
                trace!("Dropping message pushed to stopped queue");
                return false;
            }
            inner.messages.push_back(message);
        }
        self.available.notify_one();
        true
    }

    /// Remove and return the head message, waiting for one if necessary.
    ///
    /// Fails with [`QueueError::Interrupted`] once the queue is stopped and
    /// empty.
    pub async fn pop(&self) -> Result<M, QueueError> {
        self.wait_for(|messages| messages.pop_front()).await
    }

    /// Remove the head message if one is pending, without waiting.
    pub fn try_pop(&self) -> Option<M> {
        self.inner.lock().messages.pop_front()
    }

    /// Set the stopped flag and wake every blocked reader. Idempotent.
    pub fn stop(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.stopped {
                return;
            }
            inner.stopped = true;
            debug!(pending = inner.messages.len(), "Message queue stopped");
        }
        self.available.notify_waiters();
    }

    /// Clear the stopped flag. Pending messages are kept.
    pub fn reset(&self) {
        self.inner.lock().stopped = false;
    }

    /// Whether `stop()` has been called since the last `reset()`.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.inner.lock().stopped
    }

    /// Number of pending messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().messages.len()
    }

    /// Whether no messages are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().messages.is_empty()
    }

    async fn wait_for<R>(
        &self,
        take: impl Fn(&mut VecDeque<M>) -> Option<R>,
    ) -> Result<R, QueueError> {
        loop {
            // Register interest before inspecting state so a push or stop
            // racing with the check still wakes us.
            let mut notified = pin!(self.available.notified());
            notified.as_mut().enable();

            {
                let mut inner = self.inner.lock();
                if let Some(result) = take(&mut inner.messages) {
                    return Ok(result);
                }
                if inner.stopped {
                    return Err(QueueError::Interrupted);
                }
            }

            notified.await;
        }
    }
}

impl<M: Clone> MessageQueue<M> {
    /// Return a copy of the head message without removing it, waiting for
    /// one if necessary.
    ///
    /// Fails with [`QueueError::Interrupted`] once the queue is stopped and
    /// empty.
    pub async fn front(&self) -> Result<M, QueueError> {
        self.wait_for(|messages| messages.front().cloned()).await
    }
}

impl<M> Default for MessageQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for MessageQueue<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("MessageQueue")
            .field("pending", &inner.messages.len())
            .field("stopped", &inner.stopped)
            .finish()
    }
}

/// Something that keeps a registry of message queues.
pub trait MessageQueueOwner<M> {
    /// Register `queue`. Returns `false` if it was already registered.
    fn add_message_queue(&self, queue: &Arc<MessageQueue<M>>) -> bool;

    /// Deregister `queue`. Returns `false` if it was not registered.
    fn remove_message_queue(&self, queue: &Arc<MessageQueue<M>>) -> bool;
}

/// Scoped registration of a queue with its owner.
///
/// The queue is registered on construction and deregistered on drop, so it
/// never outlives its subscription in the owner's registry.
pub struct MessageQueueGuard<O, M>
where
    O: MessageQueueOwner<M> + ?Sized,
{
    owner: Arc<O>,
    queue: Arc<MessageQueue<M>>,
    registered: bool,
}

impl<O, M> MessageQueueGuard<O, M>
where
    O: MessageQueueOwner<M> + ?Sized,
{
    /// Register `queue` with `owner` for the lifetime of the guard.
    pub fn new(owner: Arc<O>, queue: Arc<MessageQueue<M>>) -> Self {
        let registered = owner.add_message_queue(&queue);
        if !registered {
            warn!("Message queue was already registered with this owner");
        }
        Self {
            owner,
            queue,
            registered,
        }
    }

    /// The guarded queue.
    #[must_use]
    pub fn queue(&self) -> &Arc<MessageQueue<M>> {
        &self.queue
    }
}

impl<O, M> Deref for MessageQueueGuard<O, M>
where
    O: MessageQueueOwner<M> + ?Sized,
{
    type Target = MessageQueue<M>;

    fn deref(&self) -> &Self::Target {
        &self.queue
    }
}

impl<O, M> Drop for MessageQueueGuard<O, M>
where
    O: MessageQueueOwner<M> + ?Sized,
{
    fn drop(&mut self) {
        if !self.registered {
            return;
        }
        if !self.owner.remove_message_queue(&self.queue) {
            warn!("Message queue was deregistered behind its guard");
        }
    }
}
