//! Chain observer: logs every blockchain event delivered to its queue.

use shared_bus::{BlockchainMessage, MessageQueueGuard, MessageQueueOwner};
use shared_types::entities::short_hash;
use tracing::{debug, info};

/// Consume events until the queue is interrupted.
///
/// Returns the number of events consumed. The queue is deregistered when
/// this returns.
pub async fn observe_chain<O>(subscription: MessageQueueGuard<O, BlockchainMessage>) -> u64
where
    O: MessageQueueOwner<BlockchainMessage> + ?Sized,
{
    let mut seen = 0u64;

    while let Ok(message) = subscription.pop().await {
        seen += 1;
        log_event(&message);
    }

    debug!(events = seen, "Chain observer stopped");
    seen
}

fn log_event(message: &BlockchainMessage) {
    match message {
        BlockchainMessage::NewBlock { block_hash } => {
            info!(hash = %short_hash(block_hash), "New block on main chain");
        }
        BlockchainMessage::NewAlternativeBlock { block_hash } => {
            info!(hash = %short_hash(block_hash), "New alternative block");
        }
        BlockchainMessage::ChainSwitch { block_hashes } => {
            info!(blocks = block_hashes.len(), "Chain switched");
        }
        BlockchainMessage::AddTransaction { transaction_hashes } => {
            debug!(count = transaction_hashes.len(), "Transactions added to pool");
        }
        BlockchainMessage::DeleteTransaction {
            transaction_hashes,
            reason,
        } => {
            debug!(
                count = transaction_hashes.len(),
                ?reason,
                "Transactions removed from pool"
            );
        }
    }
}
