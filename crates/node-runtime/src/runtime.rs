//! # Node Runtime
//!
//! Wires the shared message bus to the block producer.
//!
//! ```text
//!   mining loop ──produce()──→ Miner (N worker threads)
//!        │                          │
//!        │ ◄──────── Block ─────────┘
//!        ↓
//!   MessageBus ──NewBlock──→ chain observer queue
//!                       └──→ any other subscriber queue
//! ```
//!
//! ## Shutdown Sequence
//!
//! 1. Raise the shutdown flag so the mining loop starts no new search
//! 2. Stop the miner until the mining loop has exited
//! 3. Interrupt every subscriber queue

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use qc_17_block_production::{
    utils::block_hash, BlockMiningParameters, BlockProducer, BlockProductionError, Miner,
    Sha256dProofOfWork,
};
use shared_bus::{BlockchainMessage, MessageBus, MessagePublisher, MessageQueueGuard};
use shared_types::entities::{short_hash, Block, NULL_HASH};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::NodeConfig;
use crate::observer::observe_chain;

/// How long shutdown waits for the mining loop before stopping the miner
/// again.
const STOP_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Bus carrying blockchain events.
pub type EventBus = MessageBus<BlockchainMessage>;

/// The main node runtime.
pub struct NodeRuntime {
    /// Validated configuration.
    config: NodeConfig,
    /// Event fan-out to subscriber queues.
    bus: Arc<EventBus>,
    /// Mines and announces blocks.
    producer: BlockProducer<Sha256dProofOfWork>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create a new node runtime with configuration.
    pub fn new(config: NodeConfig) -> Self {
        info!(
            threads = config.mining.threads,
            difficulty = config.difficulty,
            "Creating Quantum-Chain node runtime"
        );

        let bus = Arc::new(EventBus::new());
        let miner = Arc::new(Miner::with_config(
            Sha256dProofOfWork,
            config.mining.clone(),
        ));
        let publisher: Arc<dyn MessagePublisher<BlockchainMessage>> = bus.clone();
        let producer = BlockProducer::new(miner, publisher);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            bus,
            producer,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Runtime configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The event bus.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// The block producer.
    pub fn producer(&self) -> &BlockProducer<Sha256dProofOfWork> {
        &self.producer
    }

    /// Whether shutdown has been requested.
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Subscribe a new queue to the event bus.
    pub fn subscribe(&self) -> MessageQueueGuard<EventBus, BlockchainMessage> {
        self.bus.subscribe()
    }

    /// Spawn the chain observer on its own queue.
    ///
    /// The task ends when the bus is interrupted and returns the number of
    /// events it consumed.
    pub fn spawn_observer(&self) -> JoinHandle<u64> {
        let subscription = self.subscribe();
        tokio::spawn(observe_chain(subscription))
    }

    /// Mine blocks on top of each other until shutdown or until
    /// `max_blocks` have been produced.
    ///
    /// Returns the number of blocks mined.
    pub async fn run_mining(&self) -> Result<u64> {
        let mut previous = NULL_HASH;
        let mut height = 0u64;

        info!(max_blocks = self.config.max_blocks, "Mining loop started");

        while !self.is_shutting_down() && !self.reached_max_blocks(height) {
            let parameters = BlockMiningParameters {
                block_template: Block::new(height, unix_time(), previous),
                difficulty: self.config.difficulty,
            };

            match self.producer.produce(parameters).await {
                Ok(block) => {
                    previous = block_hash(&block);
                    height += 1;
                    debug!(height, tip = %short_hash(&previous), "Chain tip advanced");
                }
                Err(BlockProductionError::Mining(e)) if e.is_interruption() => {
                    if self.is_shutting_down() {
                        break;
                    }
                    warn!(height, "Mining interrupted without shutdown, retrying");
                }
                Err(e) => return Err(e).context("Block production failed"),
            }
        }

        let metrics = self.producer.miner().metrics();
        info!(
            blocks = height,
            attempts = metrics.get_attempts(),
            hashrate = metrics.get_hashrate(),
            "Mining loop finished"
        );
        Ok(height)
    }

    /// Shut the node down gracefully and wait for the mining loop.
    ///
    /// Returns the mining loop's result.
    pub async fn shutdown(&self, mut mining: JoinHandle<Result<u64>>) -> Result<u64> {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let mined = loop {
            self.producer.stop().await?;
            tokio::select! {
                joined = &mut mining => break joined.context("Mining task panicked")?,
                _ = tokio::time::sleep(STOP_RETRY_INTERVAL) => {
                    debug!("Mining loop still running, stopping miner again");
                }
            }
        };

        self.bus.interrupt();
        info!(
            published = self.bus.messages_published(),
            "Shutdown complete"
        );
        mined
    }

    fn reached_max_blocks(&self, height: u64) -> bool {
        self.config.max_blocks != 0 && height >= self.config.max_blocks
    }
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
