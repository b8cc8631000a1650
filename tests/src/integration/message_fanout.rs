//! # Message Fan-out Integration Tests
//!
//! Broadcast of blockchain events to independent subscriber queues.
//!
//! ## Properties Tested:
//!
//! 1. **Replication**: every registered queue sees every message once, in order
//! 2. **Interruption**: a blocked consumer is woken by `stop()` and fails
//! 3. **Scoped registration**: guards leave the registry empty on every exit path
//! 4. **Isolation**: a consumer that never reads does not hold back the others

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use shared_bus::{
        BlockchainMessage, DeleteTransactionReason, IntrusiveLinkedList, MessageBus,
        MessagePublisher, MessageQueue, MessageQueueGuard, MessageType, QueueError,
    };
    use shared_types::entities::Hash;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const WAIT: Duration = Duration::from_secs(5);

    fn hash(n: u8) -> Hash {
        [n; 32]
    }

    fn new_block(n: u8) -> BlockchainMessage {
        BlockchainMessage::NewBlock {
            block_hash: hash(n),
        }
    }

    fn event_bus() -> Arc<MessageBus<BlockchainMessage>> {
        Arc::new(MessageBus::new())
    }

    // =============================================================================
    // REPLICATION
    // =============================================================================

    #[tokio::test]
    async fn test_single_subscriber_front_then_pop() {
        let bus = event_bus();
        let sub = bus.subscribe();

        bus.publish(new_block(1));

        let head = timeout(WAIT, sub.front()).await.expect("timeout").unwrap();
        assert_eq!(head.message_type(), MessageType::NewBlock);
        assert_eq!(head.new_block_hash(), Some(hash(1)));
        assert_eq!(head.chain_switch(), None);

        let popped = timeout(WAIT, sub.pop()).await.expect("timeout").unwrap();
        assert_eq!(popped, head);
        assert!(sub.is_empty());
    }

    #[tokio::test]
    async fn test_five_subscribers_see_ten_messages_in_order() {
        let bus = event_bus();
        let subscribers: Vec<_> = (0..5).map(|_| bus.subscribe()).collect();

        for n in 0..10 {
            assert_eq!(bus.publish(new_block(n)), 5);
        }

        for sub in &subscribers {
            for n in 0..10 {
                let message = timeout(WAIT, sub.pop()).await.expect("timeout").unwrap();
                assert_eq!(message.new_block_hash(), Some(hash(n)));
            }
            assert!(sub.is_empty());
        }
        assert_eq!(bus.messages_published(), 10);
    }

    #[tokio::test]
    async fn test_mixed_event_types_keep_payloads() {
        let bus = event_bus();
        let sub = bus.subscribe();

        bus.publish(BlockchainMessage::NewAlternativeBlock {
            block_hash: hash(7),
        });
        bus.publish(BlockchainMessage::ChainSwitch {
            block_hashes: vec![hash(1), hash(2), hash(3)],
        });
        bus.publish(BlockchainMessage::AddTransaction {
            transaction_hashes: vec![hash(9)],
        });
        bus.publish(BlockchainMessage::DeleteTransaction {
            transaction_hashes: vec![hash(9)],
            reason: DeleteTransactionReason::Outdated,
        });

        let alt = sub.pop().await.unwrap();
        assert_eq!(alt.new_alternative_block_hash(), Some(hash(7)));
        assert_eq!(alt.new_block_hash(), None);

        let switch = sub.pop().await.unwrap();
        assert_eq!(
            switch.chain_switch(),
            Some(&[hash(1), hash(2), hash(3)][..])
        );

        let added = sub.pop().await.unwrap();
        assert_eq!(added.added_transactions(), Some(&[hash(9)][..]));

        let deleted = sub.pop().await.unwrap();
        assert_eq!(
            deleted.deleted_transactions(),
            Some((&[hash(9)][..], DeleteTransactionReason::Outdated))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publishers_preserve_per_publisher_order() {
        const PUBLISHERS: u8 = 4;
        const PER_PUBLISHER: u8 = 50;

        let bus = event_bus();
        let subscribers: Vec<_> = (0..3).map(|_| bus.subscribe()).collect();

        let handles: Vec<_> = (0..PUBLISHERS)
            .map(|publisher| {
                let bus = Arc::clone(&bus);
                std::thread::spawn(move || {
                    for seq in 0..PER_PUBLISHER {
                        let mut block_hash = [0u8; 32];
                        block_hash[0] = publisher;
                        block_hash[1] = seq;
                        bus.publish(BlockchainMessage::NewBlock { block_hash });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let total = usize::from(PUBLISHERS) * usize::from(PER_PUBLISHER);
        let mut first_order = Vec::new();
        for (i, sub) in subscribers.iter().enumerate() {
            let mut next_seq = [0u8; PUBLISHERS as usize];
            let mut order = Vec::with_capacity(total);
            for _ in 0..total {
                let message = timeout(WAIT, sub.pop()).await.expect("timeout").unwrap();
                let block_hash = message.new_block_hash().unwrap();
                let publisher = usize::from(block_hash[0]);
                assert_eq!(block_hash[1], next_seq[publisher]);
                next_seq[publisher] += 1;
                order.push(block_hash);
            }
            // Broadcast is serialized, so every subscriber sees one global order.
            if i == 0 {
                first_order = order;
            } else {
                assert_eq!(order, first_order);
            }
        }
    }

    // =============================================================================
    // INTERRUPTION
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_wakes_blocked_front_and_stays_failed() {
        let bus = event_bus();
        let sub = bus.subscribe();
        let queue = Arc::clone(sub.queue());

        let reader = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.front().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.stop();

        let result = timeout(WAIT, reader).await.expect("timeout").expect("join");
        assert_eq!(result, Err(QueueError::Interrupted));

        assert_eq!(sub.front().await, Err(QueueError::Interrupted));
        assert_eq!(sub.pop().await, Err(QueueError::Interrupted));

        // Stopped queues no longer accept deliveries.
        assert_eq!(bus.publish(new_block(1)), 0);
        assert!(sub.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_interrupt_wakes_every_waiting_consumer() {
        let bus = event_bus();

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let sub = bus.subscribe();
                tokio::spawn(async move {
                    let mut seen = 0;
                    loop {
                        match sub.pop().await {
                            Ok(_) => seen += 1,
                            Err(QueueError::Interrupted) => return seen,
                        }
                    }
                })
            })
            .collect();

        bus.publish(new_block(1));
        bus.publish(new_block(2));
        tokio::time::sleep(Duration::from_millis(20)).await;
        bus.interrupt();

        for consumer in consumers {
            let seen = timeout(WAIT, consumer).await.expect("timeout").expect("join");
            assert_eq!(seen, 2);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    // =============================================================================
    // REGISTRATION
    // =============================================================================

    #[test]
    fn test_registry_rejects_double_insert_and_remove() {
        let mut registry = IntrusiveLinkedList::new();
        let queue = Arc::new(MessageQueue::<BlockchainMessage>::new());
        assert!(registry.is_empty());

        assert!(registry.insert(&queue));
        assert!(!registry.insert(&queue));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&queue));

        assert!(registry.remove(&queue));
        assert!(!registry.remove(&queue));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_scoped_registration_leaves_bus_empty() {
        let bus = event_bus();
        assert_eq!(bus.subscriber_count(), 0);

        let outcome: Result<(), &str> = (|| {
            let _first = bus.subscribe();
            let _second = bus.subscribe();
            assert_eq!(bus.subscriber_count(), 2);
            Err("early exit")
        })();
        assert!(outcome.is_err());
        assert_eq!(bus.subscriber_count(), 0);

        let queue = Arc::new(MessageQueue::new());
        {
            let _guard = MessageQueueGuard::new(Arc::clone(&bus), Arc::clone(&queue));
            assert!(bus.is_subscribed(&queue));
            {
                // Second guard on the same queue does not own the registration.
                let _duplicate = MessageQueueGuard::new(Arc::clone(&bus), Arc::clone(&queue));
            }
            assert!(bus.is_subscribed(&queue));
        }
        assert!(!bus.is_subscribed(&queue));

        // No delivery after deregistration.
        assert_eq!(bus.publish(new_block(1)), 0);
        assert!(queue.is_empty());
    }

    // =============================================================================
    // ISOLATION
    // =============================================================================

    #[tokio::test]
    async fn test_idle_subscriber_does_not_block_others() {
        let bus = event_bus();
        let idle = bus.subscribe();
        let active = bus.subscribe();

        for n in 0..=200u8 {
            bus.publish(new_block(n));
        }

        for n in 0..=200u8 {
            let message = timeout(WAIT, active.pop()).await.expect("timeout").unwrap();
            assert_eq!(message.new_block_hash(), Some(hash(n)));
        }
        assert_eq!(idle.len(), 201);
        assert!(active.is_empty());
    }
}
