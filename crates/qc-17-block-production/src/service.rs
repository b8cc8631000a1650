//! Block Producer Service
//!
//! Runs the blocking [`Miner`] on tokio's blocking pool and announces each
//! found block to subscribers as a `NewBlock` message.

use crate::{
    domain::{BlockMiningParameters, Miner, ProofOfWork},
    error::{BlockProductionError, Result},
    utils::hashing::block_hash,
};
use shared_bus::{BlockchainMessage, MessagePublisher};
use shared_types::entities::{short_hash, Block};
use std::sync::Arc;
use tracing::info;

/// Mines blocks and publishes them to the message bus
pub struct BlockProducer<P: ProofOfWork + 'static> {
    /// Mining engine
    miner: Arc<Miner<P>>,

    /// Where found blocks are announced
    publisher: Arc<dyn MessagePublisher<BlockchainMessage>>,

    /// Worker threads per `mine` call
    threads: usize,
}

impl<P: ProofOfWork + 'static> BlockProducer<P> {
    /// Create a producer mining with the miner's configured thread count
    pub fn new(
        miner: Arc<Miner<P>>,
        publisher: Arc<dyn MessagePublisher<BlockchainMessage>>,
    ) -> Self {
        let threads = miner.config().threads;
        Self {
            miner,
            publisher,
            threads,
        }
    }

    /// The underlying miner
    pub fn miner(&self) -> &Arc<Miner<P>> {
        &self.miner
    }

    /// Mine one block and publish it.
    ///
    /// Nothing is published when mining is interrupted.
    pub async fn produce(&self, parameters: BlockMiningParameters) -> Result<Block> {
        let miner = Arc::clone(&self.miner);
        let threads = self.threads;

        let block = tokio::task::spawn_blocking(move || miner.mine(parameters, threads))
            .await
            .map_err(|e| BlockProductionError::TaskFailed(e.to_string()))??;

        let block_hash = block_hash(&block);
        let delivered = self
            .publisher
            .publish(BlockchainMessage::NewBlock { block_hash });

        info!(
            height = block.header.height,
            nonce = block.nonce(),
            hash = %short_hash(&block_hash),
            subscribers = delivered,
            "Block produced"
        );
        Ok(block)
    }

    /// Stop a running `produce` and wait for its workers to exit.
    pub async fn stop(&self) -> Result<()> {
        let miner = Arc::clone(&self.miner);
        tokio::task::spawn_blocking(move || miner.stop())
            .await
            .map_err(|e| BlockProductionError::TaskFailed(e.to_string()))
    }
}
